//! sled 持久化实现
//!
//! 生产（打包部署）环境使用：单个 sled 树承载整个命名空间，
//! 每个键对应一个整体 JSON blob，写入后立即 flush。

use crate::error::StorageError;
use crate::traits::KeyValueStore;

/// 基于 sled 的持久键值存储。
pub struct SledKeyValueStore {
    db: sled::Db,
}

impl SledKeyValueStore {
    /// 打开（或创建）指定目录下的存储。
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SledKeyValueStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self.db.get(key)?;
        match value {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|err| StorageError::serialization(key, err.to_string())),
        }
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db.insert(key, value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db.remove(key)?;
        self.db.flush()?;
        Ok(())
    }
}
