//! Key-value adapter the stores persist through.
//!
//! Keys are plain strings and values are serialized strings (JSON for every
//! store except the language preference). Two backends ship with the crate:
//! - [`MemoryStore`]: process-local, for tests and ephemeral sessions
//! - [`FileStore`]: every key in a single JSON document on disk

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StorageResult;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key was never written.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
