//! 存储层错误类型
//!
//! 定义统一的存储错误类型，用于封装底层错误：
//! - 校验失败（必填字段缺失、唯一性冲突、格式不符）
//! - 按 id 查找未命中
//! - 序列化/反序列化失败（键存在但内容损坏）
//! - 后端错误（sled I/O、锁失败）

/// 存储错误。
///
/// 键缺失不是错误（读取返回 `Ok(None)` 或空集合）；
/// 键存在但内容无法解析必须显式报 `Serialization`，不得静默当作空集合。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("serialization failed for key '{key}': {reason}")]
    Serialization { key: String, reason: String },
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn serialization(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Serialization {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        Self::backend(err.to_string())
    }
}
