//! In-memory storage backend
//!
//! DashMap-backed byte store for tests and in-process embedding. Each
//! operation is atomic at the map level, which is all the engine requires
//! of a backend.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::types::Result;

use super::Storage;

/// Concurrent in-memory key-value store
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(path).map(|entry| entry.value().clone()))
    }

    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<()> {
        self.entries.insert(path.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.entries.remove(path);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter_map(|entry| entry.key().strip_prefix(prefix).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}
