// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;

use log::Record;

use crate::Error;
use crate::layout::Layout;

type FormatFunction = dyn Fn(&Record) -> Result<String, Error> + Send + Sync + 'static;

/// A layout that formats log records with a user-provided function.
///
/// The function accepts a [`&log::Record`][Record] and returns the formatted
/// line, without a trailing newline. For example:
///
/// ```rust
/// use hannah::layout::CustomLayout;
/// use log::Record;
///
/// let layout = CustomLayout::new(|record: &Record| {
///     Ok(format!("{} - {}", record.level(), record.args()))
/// });
/// ```
#[derive(Clone)]
pub struct CustomLayout {
    f: Arc<FormatFunction>,
}

impl Debug for CustomLayout {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "CustomLayout {{ ... }}")
    }
}

impl CustomLayout {
    pub fn new(layout: impl Fn(&Record) -> Result<String, Error> + Send + Sync + 'static) -> Self {
        CustomLayout {
            f: Arc::new(layout),
        }
    }

    pub(crate) fn format(&self, record: &Record) -> Result<String, Error> {
        (self.f)(record)
    }
}

impl From<CustomLayout> for Layout {
    fn from(layout: CustomLayout) -> Self {
        Layout::Custom(layout)
    }
}
