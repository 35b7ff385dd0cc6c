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
use std::io;

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A mode string contains unrecognized characters or grants no capability.
    InvalidMode,
    /// The operation is not permitted by the resource's capabilities.
    UnsupportedOperation,
    /// The resource has already been closed.
    Closed,
    /// A file that was expected to exist is missing.
    NotFound,
    /// An underlying I/O operation failed.
    Io,
    /// The logging pipeline could not be installed.
    Setup,
    /// An internal invariant was violated.
    Internal,
}

impl ErrorKind {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidMode => "invalid mode",
            ErrorKind::UnsupportedOperation => "unsupported operation",
            ErrorKind::Closed => "closed resource",
            ErrorKind::NotFound => "not found",
            ErrorKind::Io => "io error",
            ErrorKind::Setup => "setup error",
            ErrorKind::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const REPORT_TITLE: &str = " YIKES! There's a bug! ";
const REPORT_BODY: &str = "If you are seeing this, then there is something wrong with hannah \
and not your code. Please report this bug here: \
\"https://github.com/fast/hannah/issues/new\" so that we can fix the issue at the \
earliest. It would be a great help if you could provide the steps, a backtrace, or \
even a sample program for reproducing this bug while submitting an issue.";
const REPORT_WIDTH: usize = 80;

/// The error struct of hannah.
pub struct Error {
    kind: ErrorKind,
    message: String,
    sources: Vec<anyhow::Error>,
    context: Vec<(&'static str, String)>,
    bug: bool,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.sources.is_empty() {
            write!(f, ", sources: [")?;
            for (i, source) in self.sources.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{source}")?;
            }
            write!(f, "]")?;
        }

        if self.bug {
            f.write_str(&report())?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("sources", &self.sources);
            de.field("bug", &self.bug);
            return de.finish();
        }

        write!(f, "{}: {}", self.kind, self.message)?;
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }
        if !self.sources.is_empty() {
            writeln!(f)?;
            writeln!(f, "Sources:")?;
            for source in self.sources.iter() {
                writeln!(f, "   {source:#}")?;
            }
        }
        if self.bug {
            writeln!(f, "{}", report())?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.sources.first().map(|v| v.as_ref())
    }
}

impl Error {
    /// Create a new error with the given kind and message.
    ///
    /// Errors made this way describe expected, validated outcomes (a bad mode
    /// string, a write to a closed file) and render as `<kind>: <message>`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            sources: vec![],
            context: vec![],
            bug: false,
        }
    }

    /// Create a new error for a state no caller should be able to reach.
    ///
    /// The rendered text carries a bug-report banner pointing at the issue
    /// tracker, so the defect surfaces even when the error is merely printed.
    pub fn bug(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: message.into(),
            sources: vec![],
            context: vec![],
            bug: true,
        }
    }

    /// Add one more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Add one more source in error.
    pub fn with_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        self.sources.push(src.into());
        self
    }

    /// Return the category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Default constructor for [`Error`] from [`io::Error`].
    pub(crate) fn from_io(err: io::Error) -> Error {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::Io,
        };
        Error::new(kind, "failed to perform io").with_source(err)
    }

    /// Default constructor for [`Error`] from [`fmt::Error`].
    pub(crate) fn from_fmt(err: fmt::Error) -> Error {
        Error::new(ErrorKind::Io, "failed to format").with_source(err)
    }
}

/// Render the bug-report banner attached to unexpected errors.
fn report() -> String {
    let title = center(REPORT_TITLE, REPORT_WIDTH);
    let body = fill(REPORT_BODY, REPORT_WIDTH);
    format!("\n\n{title}\n{body}\n\n")
}

fn center(text: &str, width: usize) -> String {
    if text.len() >= width {
        return text.to_string();
    }
    let left = (width - text.len()) / 2;
    let right = width - text.len() - left;
    format!("{}{}{}", "-".repeat(left), text, "-".repeat(right))
}

fn fill(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}
