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

use std::borrow::Cow;
use std::io::IsTerminal;
use std::path::PathBuf;

use log::LevelFilter;

use crate::Error;
use crate::append::Append;
use crate::append::RotatingFile;
use crate::append::Stderr;
use crate::append::Stdout;
use crate::filter::EnvFilter;
use crate::filter::env_filter::EnvFilterBuilder;
use crate::fs::RotatingWriter;
use crate::layout::Layout;
use crate::layout::StackLayout;
use crate::logger::Dispatch;
use crate::logger::Logger;

/// The standard stream targeted by the default appender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stderr,
    Stdout,
}

/// Create a new [`Setup`] for configuring the global logger in one call.
///
/// The default configuration dispatches `INFO` and above to stderr, colored
/// when stderr is a terminal:
///
/// ```rust,no_run
/// hannah::setup().apply().unwrap();
///
/// log::info!("service started");
/// ```
///
/// Adding a rotating log file next to the stream:
///
/// ```rust,no_run
/// use log::LevelFilter;
///
/// hannah::setup()
///     .level(LevelFilter::Debug)
///     .filename("logs/app.log")
///     .apply()
///     .unwrap();
/// ```
pub fn setup() -> Setup {
    Setup::new()
}

/// A builder that assembles filters, layouts and appenders into a [`Logger`]
/// and installs it as the global logger.
///
/// When no handler is supplied, `apply` creates a stream appender (and a
/// rotating-file appender if a filename is set). Supplying handlers replaces
/// those defaults entirely.
#[must_use = "call `apply` to set the global logger"]
#[derive(Debug)]
pub struct Setup {
    level: LevelFilter,
    format: Option<Layout>,
    datefmt: Option<Cow<'static, str>>,
    handlers: Vec<Box<dyn Append>>,
    stream: Stream,
    filename: Option<PathBuf>,
    filemode: String,
    max_bytes: i64,
    max_lines: i64,
    name: Option<String>,
    capture_panics: bool,
}

impl Default for Setup {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup {
    /// Create a new [`Setup`] with the default configuration.
    pub fn new() -> Self {
        Self {
            level: LevelFilter::Info,
            format: None,
            datefmt: None,
            handlers: vec![],
            stream: Stream::Stderr,
            filename: None,
            filemode: "a".to_string(),
            max_bytes: 10_000_000,
            max_lines: -1,
            name: None,
            capture_panics: false,
        }
    }

    /// Set the level ceiling; defaults to [`LevelFilter::Info`].
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Set the layout used by every appender this builder creates.
    ///
    /// Defaults to a [`StackLayout`], colored on interactive streams only.
    pub fn format(mut self, format: impl Into<Layout>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the strftime date format of the default layout.
    ///
    /// Has no effect when a layout is supplied through [`format`][Setup::format].
    pub fn datefmt(mut self, datefmt: impl Into<Cow<'static, str>>) -> Self {
        self.datefmt = Some(datefmt.into());
        self
    }

    /// Add an appender, replacing the default stream and file appenders.
    pub fn handler(mut self, handler: impl Append) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Select the standard stream of the default appender; defaults to stderr.
    pub fn stream(mut self, stream: Stream) -> Self {
        self.stream = stream;
        self
    }

    /// Also write records to a rotating file at `filename`.
    pub fn filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the mode string the log file is opened with; defaults to `"a"`.
    ///
    /// A positive rotation threshold forces append mode regardless.
    pub fn filemode(mut self, filemode: impl Into<String>) -> Self {
        self.filemode = filemode.into();
        self
    }

    /// Set the byte threshold of the log file; defaults to 10 MB.
    ///
    /// Non-positive disables size-based rotation.
    pub fn max_bytes(mut self, n: i64) -> Self {
        self.max_bytes = n;
        self
    }

    /// Set the line threshold of the log file; defaults to disabled.
    pub fn max_lines(mut self, n: i64) -> Self {
        self.max_lines = n;
        self
    }

    /// Scope the level to one module-path prefix.
    ///
    /// Records from other targets are rejected, as if the process were run
    /// with `RUST_LOG={name}={level}`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Log panics through the pipeline before the previous panic hook runs.
    pub fn capture_panics(mut self, capture: bool) -> Self {
        self.capture_panics = capture;
        self
    }

    /// Install the configured pipeline as the global logger.
    ///
    /// # Errors
    ///
    /// Fails if the mode string is invalid, the log file cannot be opened, or
    /// the global logger has already been set.
    pub fn apply(self) -> Result<(), Error> {
        let Self {
            level,
            format,
            datefmt,
            handlers,
            stream,
            filename,
            filemode,
            max_bytes,
            max_lines,
            name,
            capture_panics,
        } = self;

        let filter = match name.as_deref() {
            Some(name) => EnvFilter::new(EnvFilterBuilder::new().filter_module(name, level)),
            None => EnvFilter::from(level),
        };

        let mut handlers = handlers.into_iter();
        let dispatch = match handlers.next() {
            Some(first) => {
                let mut dispatch = Dispatch::new().filter(filter).append(first);
                for handler in handlers {
                    dispatch = dispatch.append(handler);
                }
                dispatch
            }
            None => {
                let (stream_layout, file_layout) = resolve_layouts(format, datefmt, stream);
                let dispatch = Dispatch::new().filter(filter);
                let dispatch = match stream {
                    Stream::Stderr => dispatch.append(Stderr::with_layout(stream_layout)),
                    Stream::Stdout => dispatch.append(Stdout::with_layout(stream_layout)),
                };
                match filename {
                    Some(path) => {
                        let writer = RotatingWriter::builder()
                            .mode(filemode)
                            .max_bytes(max_bytes)
                            .max_lines(max_lines)
                            .open(path)?;
                        dispatch.append(RotatingFile::with_layout(writer, file_layout))
                    }
                    None => dispatch,
                }
            }
        };

        Logger::new().max_level(level).dispatch(dispatch).apply()?;
        if capture_panics {
            install_panic_hook();
        }
        Ok(())
    }
}

fn resolve_layouts(
    format: Option<Layout>,
    datefmt: Option<Cow<'static, str>>,
    stream: Stream,
) -> (Layout, Layout) {
    match format {
        Some(layout) => (layout.clone(), layout),
        None => {
            let mut base = StackLayout::default();
            if let Some(datefmt) = datefmt {
                base = base.datefmt(datefmt);
            }
            let interactive = match stream {
                Stream::Stderr => std::io::stderr().is_terminal(),
                Stream::Stdout => std::io::stdout().is_terminal(),
            };
            let stream_layout = if interactive {
                base.clone()
            } else {
                base.clone().no_color()
            };
            (stream_layout.into(), base.no_color().into())
        }
    }
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!(target: "panic", "{info}");
        log::logger().flush();
        previous(info);
    }));
}
