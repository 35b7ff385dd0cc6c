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

use std::io::IsTerminal;
use std::io::Write;

use crate::Error;
use crate::append::Append;
use crate::layout::Layout;
use crate::layout::StackLayout;

/// An appender that prints log records to stdout.
///
/// The default layout is a [`StackLayout`], colored only when stdout is
/// connected to a terminal.
#[derive(Debug)]
pub struct Stdout {
    layout: Layout,
}

impl Default for Stdout {
    fn default() -> Self {
        Self::new()
    }
}

impl Stdout {
    /// Creates a new `Stdout` appender with the default layout.
    pub fn new() -> Self {
        let layout = if std::io::stdout().is_terminal() {
            StackLayout::default()
        } else {
            StackLayout::default().no_color()
        };
        Self::with_layout(layout)
    }

    /// Creates a new `Stdout` appender with the given layout.
    pub fn with_layout(layout: impl Into<Layout>) -> Self {
        Self {
            layout: layout.into(),
        }
    }
}

impl Append for Stdout {
    fn append(&self, record: &log::Record) -> Result<(), Error> {
        let mut line = self.layout.format(record)?;
        line.push('\n');
        std::io::stdout()
            .write_all(line.as_bytes())
            .map_err(Error::from_io)?;
        Ok(())
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// An appender that prints log records to stderr.
///
/// The default layout is a [`StackLayout`], colored only when stderr is
/// connected to a terminal.
#[derive(Debug)]
pub struct Stderr {
    layout: Layout,
}

impl Default for Stderr {
    fn default() -> Self {
        Self::new()
    }
}

impl Stderr {
    /// Creates a new `Stderr` appender with the default layout.
    pub fn new() -> Self {
        let layout = if std::io::stderr().is_terminal() {
            StackLayout::default()
        } else {
            StackLayout::default().no_color()
        };
        Self::with_layout(layout)
    }

    /// Creates a new `Stderr` appender with the given layout.
    pub fn with_layout(layout: impl Into<Layout>) -> Self {
        Self {
            layout: layout.into(),
        }
    }
}

impl Append for Stderr {
    fn append(&self, record: &log::Record) -> Result<(), Error> {
        let mut line = self.layout.format(record)?;
        line.push('\n');
        std::io::stderr()
            .write_all(line.as_bytes())
            .map_err(Error::from_io)?;
        Ok(())
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
