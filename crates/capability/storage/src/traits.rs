//! 存储接口 Trait 定义
//!
//! 定义两个存储命名空间的接口：
//! - KeyValueStore：持久命名空间（users、seizureReports 等整体 JSON blob）
//! - EphemeralStore：标签页作用域的临时命名空间（OTP、注册中间态）
//!
//! 设计原则：
//! - 整体读、整体写，无局部更新、无事务
//! - 键缺失返回 Ok(None)，键损坏返回 Serialization 错误
//! - 单写者、单读者；多标签页并发写为后写覆盖，不做检测
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 持久键值存储接口。
///
/// 值为 JSON 文本；类型化读写通过 [`read_json`]/[`write_json`] 完成。
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 读取键的原始 JSON 文本。
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 写入键的原始 JSON 文本（整体覆盖）。
    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// 删除键（键不存在时静默成功）。
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// 读取并反序列化一个键。
///
/// 键缺失返回 `Ok(None)`；键存在但解析失败返回 `Serialization` 错误，
/// 绝不把损坏数据当作空集合。
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let raw = store.get_raw(key).await?;
    match raw {
        None => Ok(None),
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| StorageError::serialization(key, err.to_string())),
    }
}

/// 序列化并整体写入一个键。
pub async fn write_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let text = serde_json::to_string(value)
        .map_err(|err| StorageError::serialization(key, err.to_string()))?;
    store.set_raw(key, &text).await
}

/// 临时（标签页作用域）键值存储接口。
///
/// sessionStorage 的同步等价物：进程内、随会话销毁，不落盘。
pub trait EphemeralStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    /// 清空全部临时键（登出时调用）。
    fn clear(&self);
}

/// 读取并反序列化一个临时键（损坏内容同样报错，不静默）。
pub fn read_ephemeral_json<T: DeserializeOwned>(
    store: &dyn EphemeralStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key) {
        None => Ok(None),
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| StorageError::serialization(key, err.to_string())),
    }
}

/// 序列化并写入一个临时键。
pub fn write_ephemeral_json<T: Serialize>(
    store: &dyn EphemeralStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let text = serde_json::to_string(value)
        .map_err(|err| StorageError::serialization(key, err.to_string()))?;
    store.set(key, &text);
    Ok(())
}
