//! Storage collaborator interface
//!
//! The engine persists through an abstract key-value store supplied by the
//! host. A `put` is the sole durability point: the engine performs no
//! internal retries and holds no locks, so read-modify-write atomicity is
//! the backend's contract.
//!
//! Keys used by the engine: `operator` (singleton) and `account/<name>`.

pub mod memory;

use async_trait::async_trait;

use crate::types::Result;

pub use memory::MemoryStorage;

/// Abstract key-value store backing the trust store
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Read the bytes at `path`, or None when absent
    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Durably write `bytes` at `path`
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<()>;

    /// Delete `path`; deleting an absent path is not an error
    async fn delete(&self, path: &str) -> Result<()>;

    /// List child names under `prefix`, with the prefix stripped
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
