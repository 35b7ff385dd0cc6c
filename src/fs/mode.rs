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

use std::fmt;
use std::fs::OpenOptions;

use crate::Error;
use crate::ErrorKind;

/// Parsed capability view of a file mode string.
///
/// Mode strings are composed of the characters `x` (create new), `r` (read),
/// `w` (write, truncating), `a` (append), `b` and `t` (binary/text markers,
/// accepted and ignored), and `+` (widen the open options to read-write).
///
/// The capability flags follow a first-match chain: any of `x`/`w`/`a` makes
/// the mode writable only, otherwise `r` makes it readable only, otherwise `+`
/// makes it both. `"w+"` is therefore writable but not readable, while the
/// handle underneath is still opened read-write.
///
/// # Examples
///
/// ```
/// use hannah::fs::Mode;
///
/// let mode = Mode::parse("a")?;
/// assert!(mode.writable());
/// assert!(!mode.readable());
/// # Ok::<_, hannah::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    spec: String,
    create_new: bool,
    truncate: bool,
    append: bool,
    read: bool,
    write: bool,
    readable: bool,
    writable: bool,
}

impl Mode {
    /// Parse a mode string.
    ///
    /// Fails with an invalid-mode error when the string contains a character
    /// outside the recognized set, or when it grants no capability at all
    /// (`""`, `"b"`, `"t"`).
    pub fn parse(spec: &str) -> Result<Mode, Error> {
        let mut create_new = false;
        let mut truncate = false;
        let mut append = false;
        let mut read = false;
        let mut write = false;

        for ch in spec.chars() {
            match ch {
                'x' => {
                    create_new = true;
                    write = true;
                }
                'w' => {
                    truncate = true;
                    write = true;
                }
                'a' => {
                    append = true;
                    write = true;
                }
                'r' => read = true,
                '+' => {
                    read = true;
                    write = true;
                }
                'b' | 't' => {}
                _ => {
                    return Err(Error::new(
                        ErrorKind::InvalidMode,
                        format!("invalid mode: {spec:?}"),
                    ));
                }
            }
        }

        let (readable, writable) = if spec.contains(['x', 'w', 'a']) {
            (false, true)
        } else if spec.contains('r') {
            (true, false)
        } else if spec.contains('+') {
            (true, true)
        } else {
            return Err(Error::new(
                ErrorKind::InvalidMode,
                format!("invalid mode: {spec:?}"),
            ));
        };

        Ok(Mode {
            spec: spec.to_string(),
            create_new,
            truncate,
            append,
            read,
            write,
            readable,
            writable,
        })
    }

    /// Whether read operations are permitted.
    pub fn readable(&self) -> bool {
        self.readable
    }

    /// Whether write operations are permitted.
    pub fn writable(&self) -> bool {
        self.writable
    }

    /// The mode string this value was parsed from.
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    pub(crate) fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.read);
        if self.append {
            options.append(true).create(true);
        } else if self.create_new {
            options.write(true).create_new(true);
        } else if self.truncate {
            options.write(true).create(true).truncate(true);
        } else if self.write {
            options.write(true);
        }
        options
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}
