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

use log::Metadata;
use log::Record;

use crate::Error;
use crate::append::Append;
use crate::filter::Filter;
use crate::filter::FilterResult;

/// A grouped set of appenders and filters.
///
/// The [`Logger`][crate::Logger] facade dispatches log records to one or more
/// [`Dispatch`] instances. Each [`Dispatch`] instance contains a set of
/// filters and appenders.
///
/// `filters` are used to determine whether a log record should be passed to
/// the appenders. `appends` are used to write log records to a destination.
#[derive(Debug)]
pub struct Dispatch<const APPEND: bool = true> {
    filters: Vec<Filter>,
    appends: Vec<Box<dyn Append>>,
}

impl Default for Dispatch<false> {
    fn default() -> Dispatch<false> {
        Self::new()
    }
}

impl Dispatch<false> {
    /// Create a new incomplete [`Dispatch`] instance.
    ///
    /// At least one append must be added to the [`Dispatch`] before it can be used.
    pub fn new() -> Dispatch<false> {
        Self {
            filters: vec![],
            appends: vec![],
        }
    }

    /// Add a [`Filter`] to the [`Dispatch`].
    pub fn filter(mut self, filter: impl Into<Filter>) -> Dispatch<false> {
        self.filters.push(filter.into());
        self
    }
}

impl<const APPEND: bool> Dispatch<APPEND> {
    /// Add an [`Append`] to the [`Dispatch`].
    pub fn append(mut self, append: impl Append) -> Dispatch<true> {
        self.appends.push(Box::new(append));

        Dispatch {
            filters: self.filters,
            appends: self.appends,
        }
    }
}

impl Dispatch {
    pub(crate) fn enabled(&self, metadata: &Metadata) -> bool {
        for filter in &self.filters {
            match filter.enabled(metadata) {
                FilterResult::Reject => return false,
                FilterResult::Accept => return true,
                FilterResult::Neutral => {}
            }
        }

        true
    }

    pub(crate) fn log(&self, record: &Record) -> Result<(), Error> {
        for filter in &self.filters {
            match filter.matches(record) {
                FilterResult::Reject => return Ok(()),
                FilterResult::Accept => break,
                FilterResult::Neutral => {}
            }
        }

        for append in &self.appends {
            append.append(record)?;
        }
        Ok(())
    }

    pub(crate) fn flush(&self) {
        for append in &self.appends {
            append.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use log::Level;
    use log::LevelFilter;

    use super::*;
    use crate::filter::CustomFilter;

    #[derive(Debug, Default)]
    struct Capture {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl Append for Capture {
        fn append(&self, record: &Record) -> Result<(), Error> {
            self.lines.lock().unwrap().push(record.args().to_string());
            Ok(())
        }
    }

    macro_rules! record {
        ($level:expr, $message:literal) => {
            Record::builder()
                .args(format_args!($message))
                .level($level)
                .target("app")
                .build()
        };
    }

    #[test]
    fn test_filter_gates_appends() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let dispatch = Dispatch::new().filter(LevelFilter::Info).append(Capture {
            lines: lines.clone(),
        });

        dispatch.log(&record!(Level::Info, "kept")).unwrap();
        dispatch.log(&record!(Level::Debug, "dropped")).unwrap();

        assert_eq!(*lines.lock().unwrap(), vec!["kept".to_string()]);
    }

    #[test]
    fn test_accept_short_circuits_later_filters() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let dispatch = Dispatch::new()
            .filter(CustomFilter::new(|_| FilterResult::Accept))
            .filter(LevelFilter::Error)
            .append(Capture {
                lines: lines.clone(),
            });

        dispatch.log(&record!(Level::Trace, "accepted")).unwrap();

        assert_eq!(*lines.lock().unwrap(), vec!["accepted".to_string()]);
    }

    #[test]
    fn test_every_append_receives_the_record() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let dispatch = Dispatch::new()
            .append(Capture {
                lines: first.clone(),
            })
            .append(Capture {
                lines: second.clone(),
            });

        dispatch.log(&record!(Level::Warn, "fan out")).unwrap();

        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap().len(), 1);
    }
}
