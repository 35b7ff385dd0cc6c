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
use std::fmt::Write as _;

use colored::Color;
use colored::ColoredString;
use colored::Colorize;
use jiff::Zoned;
use jiff::fmt::strtime;
use jiff::tz::TimeZone;
use log::Level;

use crate::Error;
use crate::ErrorKind;
use crate::layout::Layout;
use crate::layout::kv::KvDisplay;
use crate::layout::kv::find_error;

const DATE_FORMAT: &str = "%b %d %H:%M:%S";

/// A layout that formats log records as stack-annotated text.
///
/// Output format:
///
/// ```text
/// Aug 22 14:03:51  INFO [main] app::server:42 : listening
/// Aug 22 14:03:52  WARN [main] app::server:57 : slow shutdown
/// ```
///
/// The timestamp, thread and location segments are rendered in gray and the
/// level in its level-dependent hue; [`no_color`](StackLayout::no_color)
/// disables the coloring, and the stream appenders do so themselves when
/// their destination is not an interactive terminal.
///
/// A record carrying the conventional `err` key-value is treated as an
/// attached failure: the failure's rendering replaces the message.
#[derive(Debug, Clone)]
pub struct StackLayout {
    colors: LevelColor,
    gray: Color,
    datefmt: Cow<'static, str>,
    tz: Option<TimeZone>,
    no_color: bool,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            colors: LevelColor::default(),
            gray: Color::TrueColor {
                r: 108,
                g: 108,
                b: 108,
            },
            datefmt: Cow::Borrowed(DATE_FORMAT),
            tz: None,
            no_color: false,
        }
    }
}

/// Customize the color of each log level.
///
/// The defaults follow the original 256-color palette of the format.
#[derive(Debug, Clone)]
pub struct LevelColor {
    pub error: Color,
    pub warn: Color,
    pub info: Color,
    pub debug: Color,
    pub trace: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            error: Color::TrueColor {
                r: 255,
                g: 95,
                b: 135,
            },
            warn: Color::TrueColor {
                r: 255,
                g: 175,
                b: 95,
            },
            info: Color::TrueColor {
                r: 0,
                g: 215,
                b: 95,
            },
            debug: Color::TrueColor {
                r: 0,
                g: 255,
                b: 255,
            },
            trace: Color::TrueColor {
                r: 175,
                g: 0,
                b: 215,
            },
        }
    }
}

impl StackLayout {
    /// Creates a new `StackLayout` with the default palette and date format.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables ANSI coloring.
    #[must_use]
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Sets the per-level colors.
    #[must_use]
    pub fn colors(mut self, colors: LevelColor) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the color of the timestamp, thread and location segments.
    #[must_use]
    pub fn gray(mut self, gray: Color) -> Self {
        self.gray = gray;
        self
    }

    /// Sets the strftime-style date format; defaults to `"%b %d %H:%M:%S"`.
    #[must_use]
    pub fn datefmt(mut self, datefmt: impl Into<Cow<'static, str>>) -> Self {
        self.datefmt = datefmt.into();
        self
    }

    /// Sets the timezone of the timestamp; defaults to the system timezone.
    #[must_use]
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    pub(crate) fn format(&self, record: &log::Record) -> Result<String, Error> {
        let zoned = match self.tz.clone() {
            Some(tz) => Zoned::now().with_time_zone(tz),
            None => Zoned::now(),
        };
        let time = strtime::format(self.datefmt.as_bytes(), &zoned).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to format timestamp").with_source(err)
        })?;

        let thread = std::thread::current();
        let thread = thread.name().unwrap_or("unnamed");
        let module = record.module_path().unwrap_or_else(|| record.target());
        let line = record.line().unwrap_or_default();
        let message = match find_error(record.key_values()) {
            Some(failure) => failure,
            None => record.args().to_string(),
        };
        let kvs = KvDisplay::new(record.key_values());

        let mut out = String::new();
        if self.no_color {
            write!(
                out,
                "{time} {level:>5} [{thread}] {module}:{line} : {message}{kvs}",
                level = record.level(),
            )
        } else {
            let color = match record.level() {
                Level::Error => self.colors.error,
                Level::Warn => self.colors.warn,
                Level::Info => self.colors.info,
                Level::Debug => self.colors.debug,
                Level::Trace => self.colors.trace,
            };
            let time = time.as_str().color(self.gray);
            let level = ColoredString::from(format!("{:>5}", record.level())).color(color);
            let location =
                ColoredString::from(format!("[{thread}] {module}:{line} : ")).color(self.gray);
            write!(out, "{time} {level} {location}{message}{kvs}")
        }
        .map_err(Error::from_fmt)?;
        Ok(out)
    }
}

impl From<StackLayout> for Layout {
    fn from(layout: StackLayout) -> Self {
        Layout::Stack(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_segments() {
        let line = StackLayout::default()
            .no_color()
            .format(
                &log::Record::builder()
                    .args(format_args!("service started"))
                    .level(Level::Info)
                    .target("app")
                    .module_path_static(Some("app::server"))
                    .line(Some(42))
                    .build(),
            )
            .unwrap();

        assert!(line.contains(" INFO "), "level not padded in {line:?}");
        assert!(line.ends_with("app::server:42 : service started"));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_target_fallback_without_module_path() {
        let line = StackLayout::default()
            .no_color()
            .format(
                &log::Record::builder()
                    .args(format_args!("hello"))
                    .level(Level::Debug)
                    .target("bare_target")
                    .build(),
            )
            .unwrap();

        assert!(line.contains("bare_target:0 : hello"));
    }

    #[test]
    fn test_datefmt_is_honored() {
        let line = StackLayout::default()
            .no_color()
            .datefmt("%Y")
            .format(
                &log::Record::builder()
                    .args(format_args!("tick"))
                    .level(Level::Trace)
                    .target("app")
                    .build(),
            )
            .unwrap();

        let year = Zoned::now().year().to_string();
        assert!(line.starts_with(&year), "line {line:?} should begin {year}");
    }

    #[test]
    fn test_invalid_datefmt_fails() {
        let result = StackLayout::default().no_color().datefmt("%").format(
            &log::Record::builder()
                .args(format_args!("tick"))
                .level(Level::Trace)
                .target("app")
                .build(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_key_values_append_to_line() {
        let kvs = [("flow", "ingest"), ("shard", "7")];
        let line = StackLayout::default()
            .no_color()
            .format(
                &log::Record::builder()
                    .args(format_args!("accepted"))
                    .level(Level::Info)
                    .target("app")
                    .key_values(&kvs)
                    .build(),
            )
            .unwrap();

        assert!(line.contains("accepted flow=ingest shard=7"));
    }

    #[test]
    fn test_attached_failure_replaces_message() {
        let kvs = [("err", "unsupported operation: file not open in writing mode")];
        let line = StackLayout::default()
            .no_color()
            .format(
                &log::Record::builder()
                    .args(format_args!("doomed"))
                    .level(Level::Error)
                    .target("app")
                    .key_values(&kvs)
                    .build(),
            )
            .unwrap();

        assert!(line.contains("unsupported operation: file not open in writing mode"));
        assert!(!line.contains("doomed"));
        assert!(!line.contains("err="));
    }
}
