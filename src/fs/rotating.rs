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

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::ErrorKind;
use crate::fs::AsText;
use crate::fs::Mode;
use crate::fs::PathInfo;

const DEFAULT_ENCODING: &str = "utf-8";

/// A writer over a single named file that rolls it over to indexed backups.
///
/// Every `write` appends one joined record, flushes, and then re-evaluates the
/// byte and line thresholds; when either is exceeded, the current file is
/// renamed to `<path>.<backup_index>` and a fresh file is opened at the
/// original path. Backups are never deleted.
///
/// The writer itself does no locking; callers serialize access (see
/// [`RotatingFile`](crate::append::RotatingFile) for a mutex-guarded use).
///
/// # Examples
///
/// ```no_run
/// use hannah::fs::RotatingWriter;
///
/// let mut writer = RotatingWriter::builder()
///     .max_bytes(4096)
///     .open("app.log")?;
/// writer.write(["status", "ready"])?;
/// writer.close()?;
/// # Ok::<_, hannah::Error>(())
/// ```
#[derive(Debug)]
pub struct RotatingWriter {
    info: PathInfo,
    mode: Mode,
    encoding: String,
    max_bytes: i64,
    max_lines: i64,
    line_limit: i64,
    backup_index: usize,
    file: Option<File>,
}

impl RotatingWriter {
    /// Creates a new [`RotatingWriterBuilder`].
    #[must_use]
    pub fn builder() -> RotatingWriterBuilder {
        RotatingWriterBuilder::new()
    }

    /// The path of the current file.
    pub fn path(&self) -> &Path {
        self.info.path()
    }

    /// The metadata view over the current file.
    pub fn info(&self) -> &PathInfo {
        &self.info
    }

    /// The effective mode; `"a"` whenever a rotation threshold is active.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The text-encoding label of the underlying byte stream.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// The index the next backup file will receive.
    pub fn backup_index(&self) -> usize {
        self.backup_index
    }

    /// Whether the writer has been closed.
    pub fn closed(&self) -> bool {
        self.file.is_none()
    }

    /// Write the values joined by single spaces and terminated by a newline.
    ///
    /// Flushes, then rotates if a threshold is exceeded.
    pub fn write<I>(&mut self, values: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: AsText,
    {
        self.write_with(values, " ", "\n")
    }

    /// Write the values joined by `sep` and terminated by `end`.
    ///
    /// Each value converts through [`AsText`]; `None` renders as empty text.
    /// Fails before touching the file when the writer is closed or not
    /// writable.
    pub fn write_with<I>(&mut self, values: I, sep: &str, end: &str) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: AsText,
    {
        self.ensure_open()?;
        self.ensure_writable()?;

        let mut record = String::new();
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                record.push_str(sep);
            }
            value.write_text(&mut record);
        }
        record.push_str(end);

        let file = self.handle()?;
        file.write_all(record.as_bytes()).map_err(Error::from_io)?;
        file.flush().map_err(Error::from_io)?;
        self.rotate()
    }

    /// Flush write buffers.
    ///
    /// Flushed data survives an application crash but not necessarily an OS
    /// crash.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.ensure_open()?;
        self.ensure_writable()?;
        self.handle()?.flush().map_err(Error::from_io)
    }

    /// Roll the file over to an indexed backup if a threshold is exceeded.
    ///
    /// Runs automatically at the end of every `write`; a no-op while both
    /// thresholds are non-positive. The pre-rotation file is renamed, never
    /// deleted; a file missing at rotation time signals external interference
    /// and fails with a not-found error.
    pub fn rotate(&mut self) -> Result<(), Error> {
        let mut rollover = false;
        if self.max_bytes > 0 && self.info.size()? > self.max_bytes as u64 {
            rollover = true;
        }
        if !rollover && self.max_lines > 0 && (self.info.line_count()? as i64) > self.line_limit {
            rollover = true;
        }
        if !rollover {
            return Ok(());
        }

        self.ensure_open()?;
        self.file = None;
        if self.info.path().exists() {
            let backup = backup_path(self.info.path(), self.backup_index);
            fs::rename(self.info.path(), &backup)
                .map_err(|err| Error::from_io(err).with_context("path", backup.display()))?;
            self.backup_index += 1;
        } else {
            return Err(
                Error::new(ErrorKind::NotFound, "file vanished before rotation")
                    .with_context("path", self.info.path().display()),
            );
        }
        self.file = Some(open_file(self.info.path(), &self.mode)?);
        Ok(())
    }

    /// Flush and close the writer.
    ///
    /// A closed writer cannot be used for further I/O. Calling `close` more
    /// than once has no effect.
    pub fn close(&mut self) -> Result<(), Error> {
        if let Some(mut file) = self.file.take() {
            if self.mode.writable() {
                file.flush().map_err(Error::from_io)?;
            }
        }
        Ok(())
    }

    /// Read up to `n` characters from the current file, or from the earliest
    /// backup when `read_current` is false.
    pub fn read_chunk(&self, n: usize, read_current: bool) -> Result<String, Error> {
        self.ensure_open()?;
        self.ensure_readable()?;

        let path = if read_current {
            self.info.path().to_path_buf()
        } else {
            let earliest = self
                .info
                .siblings()?
                .into_iter()
                .next()
                .unwrap_or_else(|| self.info.basename().into_owned());
            self.info.parent().join(earliest)
        };
        let mut contents = fs::read_to_string(&path)
            .map_err(|err| Error::from_io(err).with_context("path", path.display()))?;
        truncate_chars(&mut contents, n);
        Ok(contents)
    }

    /// Iterate over the full contents of every sibling file, one chunk per
    /// file, backups in ascending index order with the current file last.
    ///
    /// Chunks are read lazily; each call returns a fresh iterator.
    pub fn read_all(&self) -> Result<Chunks, Error> {
        self.ensure_open()?;
        self.ensure_readable()?;

        let parent = self.info.parent().to_path_buf();
        let paths = self
            .info
            .siblings()?
            .into_iter()
            .map(|name| parent.join(name))
            .collect::<Vec<_>>();
        Ok(Chunks {
            paths: paths.into_iter(),
        })
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.closed() {
            return Err(closed_error());
        }
        Ok(())
    }

    fn ensure_readable(&self) -> Result<(), Error> {
        if !self.mode.readable() {
            return Err(Error::new(
                ErrorKind::UnsupportedOperation,
                "file not open in reading mode",
            ));
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), Error> {
        if !self.mode.writable() {
            return Err(Error::new(
                ErrorKind::UnsupportedOperation,
                "file not open in writing mode",
            ));
        }
        Ok(())
    }

    fn handle(&mut self) -> Result<&mut File, Error> {
        self.file.as_mut().ok_or_else(closed_error)
    }
}

/// Iterator over sibling file contents produced by
/// [`RotatingWriter::read_all`].
#[derive(Debug)]
pub struct Chunks {
    paths: std::vec::IntoIter<PathBuf>,
}

impl Iterator for Chunks {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        Some(
            fs::read_to_string(&path)
                .map_err(|err| Error::from_io(err).with_context("path", path.display())),
        )
    }
}

/// A builder for configuring [`RotatingWriter`].
#[derive(Debug)]
pub struct RotatingWriterBuilder {
    mode: String,
    encoding: Option<String>,
    max_bytes: i64,
    max_lines: i64,
    ignore_linebreak: bool,
}

impl Default for RotatingWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RotatingWriterBuilder {
    /// Creates a new [`RotatingWriterBuilder`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: "a".to_string(),
            encoding: None,
            max_bytes: -1,
            max_lines: -1,
            ignore_linebreak: true,
        }
    }

    /// Sets the mode string; defaults to `"a"`.
    ///
    /// Accepted characters are exactly `x`, `r`, `w`, `a`, `b`, `t` and `+`.
    #[must_use]
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Sets the text-encoding label; defaults to `"utf-8"`.
    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Sets the byte threshold; non-positive disables size-based rotation.
    #[must_use]
    pub fn max_bytes(mut self, n: i64) -> Self {
        self.max_bytes = n;
        self
    }

    /// Sets the line threshold; non-positive disables line-based rotation.
    #[must_use]
    pub fn max_lines(mut self, n: i64) -> Self {
        self.max_lines = n;
        self
    }

    /// Compensate for the trailing line-count artifact; defaults to true.
    ///
    /// When set, the effective line threshold is `max_lines - 1`.
    #[must_use]
    pub fn ignore_linebreak(mut self, ignore: bool) -> Self {
        self.ignore_linebreak = ignore;
        self
    }

    /// Opens the file and builds the [`RotatingWriter`].
    ///
    /// A positive threshold forces the effective mode to append. The backup
    /// index is seeded from the backups already present next to `path`.
    pub fn open(self, path: impl Into<PathBuf>) -> Result<RotatingWriter, Error> {
        let Self {
            mode,
            encoding,
            max_bytes,
            max_lines,
            ignore_linebreak,
        } = self;

        let mode = Mode::parse(&mode)?;
        let mode = if max_bytes > 0 || max_lines > 0 {
            Mode::parse("a")?
        } else {
            mode
        };
        let line_limit = if ignore_linebreak {
            max_lines.saturating_sub(1)
        } else {
            max_lines
        };
        let encoding = encoding.unwrap_or_else(|| DEFAULT_ENCODING.to_string());

        let info = PathInfo::new(path);
        let parent = info.parent();
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| Error::from_io(err).with_context("path", parent.display()))?;
        }
        let backup_index = info.index()?.saturating_sub(1);
        let file = open_file(info.path(), &mode)?;

        Ok(RotatingWriter {
            info,
            mode,
            encoding,
            max_bytes,
            max_lines,
            line_limit,
            backup_index,
            file: Some(file),
        })
    }
}

fn closed_error() -> Error {
    Error::new(ErrorKind::Closed, "I/O operation on closed file")
}

fn open_file(path: &Path, mode: &Mode) -> Result<File, Error> {
    mode.open_options()
        .open(path)
        .map_err(|err| Error::from_io(err).with_context("path", path.display()))
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn truncate_chars(text: &mut String, n: usize) {
    if let Some((idx, _)) = text.char_indices().nth(n) {
        text.truncate(idx);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;

    fn generate_random_string(len: usize) -> String {
        let mut rng = rand::rng();
        std::iter::repeat(())
            .map(|()| rng.sample(Alphanumeric))
            .map(char::from)
            .take(len)
            .collect()
    }

    #[test]
    fn test_invalid_modes_fail_construction() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        for mode in ["c", "z", "rc", "", "b"] {
            let err = RotatingWriter::builder()
                .mode(mode)
                .open(temp_dir.path().join("app.log"))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidMode, "mode {mode:?}");
        }
    }

    #[test]
    fn test_valid_modes_construct() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let existing = temp_dir.path().join("existing.log");
        fs::write(&existing, "seed\n").unwrap();

        for mode in ["r", "rb", "r+", "+"] {
            assert!(RotatingWriter::builder().mode(mode).open(&existing).is_ok());
        }
        for mode in ["w", "a", "wt", "a+"] {
            let path = temp_dir.path().join(format!("out-{mode}.log"));
            assert!(RotatingWriter::builder().mode(mode).open(path).is_ok());
        }
        let created = RotatingWriter::builder()
            .mode("x")
            .open(temp_dir.path().join("new.log"));
        assert!(created.is_ok());
    }

    #[test]
    fn test_write_joins_values() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");

        let mut writer = RotatingWriter::builder().mode("w").open(&path).unwrap();
        writer.write(["status", "ready"]).unwrap();
        writer.write_with(["a", "b"], "-", "!\n").unwrap();
        writer.write([Option::<&str>::None, Some("x")]).unwrap();
        writer.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "status ready\na-b!\n x\n");
    }

    #[test]
    fn test_write_requires_writable() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "seed\n").unwrap();

        let mut writer = RotatingWriter::builder().mode("r").open(&path).unwrap();
        let err = writer.write(["x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        let err = writer.flush().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_read_requires_readable() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let writer = RotatingWriter::builder()
            .mode("a")
            .open(temp_dir.path().join("app.log"))
            .unwrap();

        let err = writer.read_chunk(10, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        let err = writer.read_all().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_close_is_idempotent() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let mut writer = RotatingWriter::builder()
            .mode("w")
            .open(temp_dir.path().join("app.log"))
            .unwrap();

        assert!(!writer.closed());
        writer.close().unwrap();
        assert!(writer.closed());
        writer.close().unwrap();
        assert!(writer.closed());

        let err = writer.write(["x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Closed);
        let err = writer.read_chunk(1, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Closed);
    }

    #[test]
    fn test_rotation_by_size() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let max_bytes = 1000;
        let rotations = 5;

        let mut writer = RotatingWriter::builder()
            .max_bytes(max_bytes)
            .open(&path)
            .unwrap();

        for i in 0..rotations {
            let record = generate_random_string(max_bytes as usize + 100);
            writer.write([record]).unwrap();
            assert_eq!(writer.backup_index(), i + 1);
        }

        for i in 0..rotations {
            let backup = temp_dir.path().join(format!("app.log.{i}"));
            assert!(backup.exists(), "missing backup {i}");
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert_eq!(
            fs::read_dir(temp_dir.path()).unwrap().count(),
            rotations + 1
        );
    }

    #[test]
    fn test_rotate_is_noop_when_disabled() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");

        let mut writer = RotatingWriter::builder().mode("w").open(&path).unwrap();
        writer.write([generate_random_string(5000)]).unwrap();
        writer.rotate().unwrap();

        assert_eq!(writer.backup_index(), 0);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);

        // Still a no-op after close.
        writer.close().unwrap();
        writer.rotate().unwrap();
    }

    #[test]
    fn test_line_rotation_at_effective_zero() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");

        let mut writer = RotatingWriter::builder().max_lines(1).open(&path).unwrap();
        writer.write(["a"]).unwrap();

        let backup = temp_dir.path().join("app.log.0");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "a\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_line_rotation_with_linebreaks_counted() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");

        let mut writer = RotatingWriter::builder()
            .max_lines(2)
            .ignore_linebreak(false)
            .open(&path)
            .unwrap();

        writer.write(["one"]).unwrap();
        writer.write(["two"]).unwrap();
        assert_eq!(writer.backup_index(), 0);

        writer.write(["three"]).unwrap();
        assert_eq!(writer.backup_index(), 1);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("app.log.0")).unwrap(),
            "one\ntwo\nthree\n"
        );
    }

    #[test]
    fn test_positive_threshold_forces_append() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "keep\n").unwrap();

        let mut writer = RotatingWriter::builder()
            .mode("w")
            .max_bytes(10_000)
            .open(&path)
            .unwrap();
        assert_eq!(writer.mode().as_str(), "a");

        writer.write(["more"]).unwrap();
        writer.close().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep\nmore\n");
    }

    #[test]
    fn test_backup_index_seeded_from_existing_backups() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "current\n").unwrap();
        fs::write(temp_dir.path().join("app.log.0"), "zero\n").unwrap();
        fs::write(temp_dir.path().join("app.log.1"), "one\n").unwrap();

        let mut writer = RotatingWriter::builder().max_lines(1).open(&path).unwrap();
        assert_eq!(writer.backup_index(), 2);

        writer.write(["next"]).unwrap();
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("app.log.2")).unwrap(),
            "current\nnext\n"
        );
        assert_eq!(writer.backup_index(), 3);
    }

    #[test]
    fn test_missing_file_fails_rotation() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");

        let mut writer = RotatingWriter::builder().max_lines(1).open(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let err = writer.write(["a"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_read_chunk_and_read_all() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "current\n").unwrap();
        fs::write(temp_dir.path().join("app.log.0"), "first\n").unwrap();
        fs::write(temp_dir.path().join("app.log.1"), "second\n").unwrap();

        let writer = RotatingWriter::builder().mode("r").open(&path).unwrap();
        assert_eq!(writer.read_chunk(3, true).unwrap(), "cur");
        assert_eq!(writer.read_chunk(100, false).unwrap(), "first\n");

        let chunks = writer
            .read_all()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(chunks, vec!["first\n", "second\n", "current\n"]);
    }

    #[test]
    fn test_read_chunk_counts_characters() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "héllo wörld").unwrap();

        let writer = RotatingWriter::builder().mode("r").open(&path).unwrap();
        assert_eq!(writer.read_chunk(5, true).unwrap(), "héllo");
    }
}
