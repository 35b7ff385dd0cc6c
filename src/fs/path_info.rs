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
use std::fs;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;

/// Metadata derivations for a file path.
///
/// The string-shaped accessors (`parent`, `basename`, `stem`, `suffix`) are
/// pure; `size`, `siblings`, `index` and `line_count` consult the filesystem
/// on every call.
///
/// # Examples
///
/// ```
/// use hannah::fs::PathInfo;
///
/// let info = PathInfo::new("/tmp/x/report.csv");
/// assert_eq!(info.basename(), "report.csv");
/// assert_eq!(info.stem(), "report");
/// assert_eq!(info.suffix(), ".csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    path: PathBuf,
}

impl PathInfo {
    /// Create a new [`PathInfo`] over the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this value derives from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory component, empty for a bare file name.
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// The file name with extension.
    pub fn basename(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    }

    /// The file name without extension.
    pub fn stem(&self) -> Cow<'_, str> {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default()
    }

    /// The extension with its leading dot, or empty text when there is none.
    pub fn suffix(&self) -> String {
        match self.path.extension() {
            Some(ext) => format!(".{}", ext.to_string_lossy()),
            None => String::new(),
        }
    }

    /// The current byte length of the file.
    pub fn size(&self) -> Result<u64, Error> {
        fs::metadata(&self.path)
            .map(|metadata| metadata.len())
            .map_err(|err| Error::from_io(err).with_context("path", self.path.display()))
    }

    /// The sorted single-character-suffixed backups in the parent directory,
    /// with the base file name itself appended last.
    pub fn siblings(&self) -> Result<Vec<String>, Error> {
        let basename = self.basename().into_owned();
        let parent = self.parent();
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };

        let read_dir = fs::read_dir(parent)
            .map_err(|err| Error::from_io(err).with_context("path", parent.display()))?;

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(Error::from_io)?;
            let filename = entry.file_name();
            // If the filename is not a UTF-8 string, skip it.
            let Some(filename) = filename.to_str() else {
                continue;
            };
            if is_backup_name(filename, &basename) {
                names.push(filename.to_string());
            }
        }
        names.sort();
        names.push(basename);
        Ok(names)
    }

    /// The count of entries in [`siblings`](PathInfo::siblings).
    pub fn index(&self) -> Result<usize, Error> {
        Ok(self.siblings()?.len())
    }

    /// The number of lines in the file; a final unterminated fragment counts.
    pub fn line_count(&self) -> Result<usize, Error> {
        let file = File::open(&self.path)
            .map_err(|err| Error::from_io(err).with_context("path", self.path.display()))?;
        let mut count = 0;
        for line in BufReader::new(file).lines() {
            line.map_err(Error::from_io)?;
            count += 1;
        }
        Ok(count)
    }
}

/// Whether `filename` matches the `<basename>*.<one char>` backup pattern.
fn is_backup_name(filename: &str, basename: &str) -> bool {
    let Some(rest) = filename.strip_prefix(basename) else {
        return false;
    };
    let mut chars = rest.chars().rev();
    matches!((chars.next(), chars.next()), (Some(_), Some('.')))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_string_derivations() {
        let info = PathInfo::new("/tmp/x/report.csv");
        assert_eq!(info.parent(), Path::new("/tmp/x"));
        assert_eq!(info.basename(), "report.csv");
        assert_eq!(info.stem(), "report");
        assert_eq!(info.suffix(), ".csv");

        let info = PathInfo::new("/tmp/x/README");
        assert_eq!(info.basename(), "README");
        assert_eq!(info.stem(), "README");
        assert_eq!(info.suffix(), "");

        let info = PathInfo::new("archive.tar.gz");
        assert_eq!(info.parent(), Path::new(""));
        assert_eq!(info.stem(), "archive.tar");
        assert_eq!(info.suffix(), ".gz");
    }

    #[test]
    fn test_size_and_line_count() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "one\ntwo\n").unwrap();

        let info = PathInfo::new(&path);
        assert_eq!(info.size().unwrap(), 8);
        assert_eq!(info.line_count().unwrap(), 2);

        fs::write(&path, "one\ntwo\nthree").unwrap();
        assert_eq!(info.line_count().unwrap(), 3);

        fs::write(&path, "").unwrap();
        assert_eq!(info.line_count().unwrap(), 0);
    }

    #[test]
    fn test_size_of_missing_file_fails() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let info = PathInfo::new(temp_dir.path().join("absent.log"));
        assert!(info.size().is_err());
    }

    #[test]
    fn test_siblings_and_index() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "current\n").unwrap();
        fs::write(temp_dir.path().join("app.log.0"), "zero\n").unwrap();
        fs::write(temp_dir.path().join("app.log.1"), "one\n").unwrap();
        // Two-character suffixes and unrelated names never match.
        fs::write(temp_dir.path().join("app.log.10"), "ten\n").unwrap();
        fs::write(temp_dir.path().join("other.log"), "other\n").unwrap();

        let info = PathInfo::new(&path);
        assert_eq!(
            info.siblings().unwrap(),
            vec!["app.log.0", "app.log.1", "app.log"]
        );
        assert_eq!(info.index().unwrap(), 3);
    }

    #[test]
    fn test_siblings_include_base_even_when_absent() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let info = PathInfo::new(temp_dir.path().join("fresh.log"));
        assert_eq!(info.siblings().unwrap(), vec!["fresh.log"]);
        assert_eq!(info.index().unwrap(), 1);
    }
}
