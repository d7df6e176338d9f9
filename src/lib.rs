pub mod models;
pub mod storage;
pub mod store;

pub use models::Review;
pub use storage::{FileStore, MemoryStore, Storage, StorageError};
pub use store::ReviewStore;
