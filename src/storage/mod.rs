pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure in a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create storage directory {}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to read key {key}")]
    Read { key: String, source: io::Error },
    #[error("failed to write key {key}")]
    Write { key: String, source: io::Error },
}

/// String key-value persistence for review collections.
///
/// The review store treats both directions as best-effort: a read failure
/// falls back to a supplied default and a write failure leaves the
/// in-memory state authoritative. Implementations only need to report
/// what happened.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`; `Ok(None)` when the key is absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
