use crate::error::{Result, TaskbotError};
use log::debug;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Flat file holding the persisted task list.
///
/// The file is opened, fully read or written, and closed within each call.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Storage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file line by line.
    ///
    /// A missing file is reported as [`TaskbotError::StorageMissing`], any
    /// other failure as [`TaskbotError::Io`].
    pub fn get_storage_contents(&self) -> Result<Vec<String>> {
        let file = fs::File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TaskbotError::StorageMissing(self.path.clone()),
            _ => TaskbotError::io(&self.path, e),
        })?;

        let lines = BufReader::new(file)
            .lines()
            .collect::<io::Result<Vec<String>>>()
            .map_err(|e| TaskbotError::io(&self.path, e))?;

        debug!("read {} line(s) from {}", lines.len(), self.path.display());
        Ok(lines)
    }

    /// Writes `contents` to the file, replacing it unless `append` is set.
    pub fn write_to_storage(&self, contents: &str, append: bool) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&self.path)
            .map_err(|e| TaskbotError::io(&self.path, e))?;

        file.write_all(contents.as_bytes())
            .map_err(|e| TaskbotError::io(&self.path, e))?;

        debug!(
            "{} {} byte(s) to {}",
            if append { "appended" } else { "wrote" },
            contents.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_storage_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("this-file-does-not-exist"));
        assert!(matches!(
            storage.get_storage_contents(),
            Err(TaskbotError::StorageMissing(_))
        ));
    }

    #[test]
    fn test_reading_a_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        assert!(matches!(
            storage.get_storage_contents(),
            Err(TaskbotError::Io { .. })
        ));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("no-such-dir").join("tasks.txt"));
        assert!(matches!(
            storage.write_to_storage("", false),
            Err(TaskbotError::Io { .. })
        ));
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("tasks.txt"));
        storage
            .write_to_storage("Coming from storage test.", false)
            .unwrap();
        let results = storage.get_storage_contents().unwrap();
        assert_eq!(results, ["Coming from storage test."]);
    }

    #[test]
    fn test_overwrite_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("tasks.txt"));
        storage.write_to_storage("first\nsecond\n", false).unwrap();
        storage.write_to_storage("third\n", false).unwrap();
        assert_eq!(storage.get_storage_contents().unwrap(), ["third"]);
        storage.write_to_storage("fourth\n", true).unwrap();
        assert_eq!(
            storage.get_storage_contents().unwrap(),
            ["third", "fourth"]
        );
    }
}
