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

use std::sync::Mutex;

use crate::Error;
use crate::append::Append;
use crate::fs::RotatingWriter;
use crate::layout::Layout;
use crate::layout::StackLayout;

/// An appender that writes log records to a file through a [`RotatingWriter`].
///
/// Each record is laid out as one line and the writer rolls the file over when
/// its thresholds are exceeded. With both thresholds disabled the writer never
/// rolls over, so this type doubles as the plain file appender.
///
/// # Examples
///
/// ```no_run
/// use hannah::append::RotatingFile;
/// use hannah::fs::RotatingWriter;
///
/// let writer = RotatingWriter::builder()
///     .max_bytes(1024 * 1024)
///     .open("logs/app.log")?;
/// let append = RotatingFile::new(writer);
/// # Ok::<_, hannah::Error>(())
/// ```
#[derive(Debug)]
pub struct RotatingFile {
    layout: Layout,
    writer: Mutex<RotatingWriter>,
}

impl RotatingFile {
    /// Creates a new `RotatingFile` appender with a colorless [`StackLayout`].
    pub fn new(writer: RotatingWriter) -> Self {
        Self::with_layout(writer, StackLayout::default().no_color())
    }

    /// Creates a new `RotatingFile` appender with the given layout.
    pub fn with_layout(writer: RotatingWriter, layout: impl Into<Layout>) -> Self {
        Self {
            layout: layout.into(),
            writer: Mutex::new(writer),
        }
    }
}

impl Append for RotatingFile {
    fn append(&self, record: &log::Record) -> Result<(), Error> {
        let line = self.layout.format(record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Error::bug("rotating file writer lock poisoned"))?;
        writer.write([line])
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
