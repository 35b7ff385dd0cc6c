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

//! Hannah is rotating file I/O and stack-aware logging for Rust applications.
//!
//! # Overview
//!
//! The crate has three pieces. The [`fs`] module provides a
//! [`RotatingWriter`](fs::RotatingWriter) that rolls its file over to numbered
//! backups when a byte or line threshold is exceeded, plus the
//! [`PathInfo`](fs::PathInfo) metadata helpers it is built on. The logging
//! pipeline ([`append`], [`filter`], [`layout`]) dispatches [`log`] records to
//! streams and rotating files, colorized on interactive terminals; it is
//! configured in one call with [`setup`] or assembled by hand with [`Logger`]
//! and [`Dispatch`]. A [`SingletonRegistry`] keeps one shared instance per
//! type for process-wide collaborators.
//!
//! # Examples
//!
//! Write through a rotating file:
//!
//! ```
//! use hannah::fs::RotatingWriter;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut writer = RotatingWriter::builder()
//!     .max_lines(100)
//!     .open(dir.path().join("app.log"))
//!     .unwrap();
//! writer.write(["status", "ready"]).unwrap();
//! ```
//!
//! Simple logging setup with the default stderr appender:
//!
//! ```no_run
//! hannah::setup().apply().unwrap();
//!
//! log::info!("service started");
//! ```
//!
//! Advanced setup with multiple dispatches:
//!
//! ```no_run
//! use hannah::Dispatch;
//! use hannah::Logger;
//! use hannah::append;
//! use log::LevelFilter;
//!
//! Logger::new()
//!     .dispatch(
//!         Dispatch::new()
//!             .filter(LevelFilter::Error)
//!             .append(append::Stderr::new()),
//!     )
//!     .dispatch(
//!         Dispatch::new()
//!             .filter(LevelFilter::Info)
//!             .append(append::Stdout::new()),
//!     )
//!     .apply()
//!     .unwrap();
//!
//! log::error!("error message");
//! log::info!("info message");
//! ```

pub mod append;
pub mod filter;
pub mod fs;
pub mod layout;

mod error;
mod logger;
mod registry;

pub use append::Append;
pub use error::Error;
pub use error::ErrorKind;
pub use filter::Filter;
pub use layout::Layout;
pub use logger::Dispatch;
pub use logger::Logger;
pub use logger::Setup;
pub use logger::Stream;
pub use logger::setup;
pub use registry::SingletonRegistry;
