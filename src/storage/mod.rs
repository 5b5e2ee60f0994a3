//! Persistence backends
//!
//! A [`Storage`] is a device-local key/value store of strings, that survives process restarts.
//! The [`TaskStore`](crate::store::TaskStore) keeps its whole task list as one JSON value in such a storage.

use std::error::Error;

use async_trait::async_trait;

mod file_storage;
pub use file_storage::FileStorage;
mod memory_storage;
pub use memory_storage::MemoryStorage;

/// The error type returned by every [`Storage`]
pub type StorageError = Box<dyn Error + Send + Sync>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the value stored under `key`, or `None` in case nothing is stored there
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Stores `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removes the value stored under `key`.
    /// Removing a key that does not exist is not an error
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
