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

//! Layouts for formatting log records.

pub use custom::CustomLayout;
pub use stack::LevelColor;
pub use stack::StackLayout;

use crate::Error;

mod custom;
mod kv;
mod stack;

/// Represents a layout for formatting log records.
#[derive(Debug, Clone)]
pub enum Layout {
    Custom(CustomLayout),
    Stack(StackLayout),
}

impl Layout {
    pub(crate) fn format(&self, record: &log::Record) -> Result<String, Error> {
        match self {
            Layout::Custom(layout) => layout.format(record),
            Layout::Stack(layout) => layout.format(record),
        }
    }
}
