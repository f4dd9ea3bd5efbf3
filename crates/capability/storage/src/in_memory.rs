//! 内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 使用 RwLock + HashMap 提供线程安全的内存存储。

use crate::error::StorageError;
use crate::traits::{EphemeralStore, KeyValueStore};
use std::collections::HashMap;
use std::sync::RwLock;

/// 持久命名空间的内存实现。
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::backend("lock failed"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::backend("lock failed"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::backend("lock failed"))?;
        entries.remove(key);
        Ok(())
    }
}

/// 临时命名空间的内存实现（sessionStorage 等价物）。
#[derive(Default)]
pub struct InMemoryEphemeralStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryEphemeralStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EphemeralStore for InMemoryEphemeralStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
