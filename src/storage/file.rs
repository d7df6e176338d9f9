use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Storage, StorageError};

/// File-backed key-value store: one JSON file per key under a base
/// directory. This is the production backend; the stored files are the
/// same arrays the site front end used to keep in browser storage.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(|source| StorageError::CreateDir {
            path: base_dir.clone(),
            source,
        })?;

        info!(dir = %base_dir.display(), "Opened file store");

        Ok(Self { base_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.key_path(key), value).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })?;

        debug!(key, bytes = value.len(), "Wrote key");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.write("reviews.pending", "[]").unwrap();

        let value = store.read("reviews.pending").unwrap();
        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.read("reviews.approved").unwrap().is_none());
    }

    #[test]
    fn test_write_replaces_previous_value() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.write("k", "old").unwrap();
        store.write("k", "new").unwrap();

        assert_eq!(store.read("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_reopen_sees_existing_data() {
        let dir = tempdir().unwrap();

        {
            let store = FileStore::open(dir.path()).unwrap();
            store.write("reviews.approved", "[1]").unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.read("reviews.approved").unwrap().as_deref(), Some("[1]"));
    }
}
