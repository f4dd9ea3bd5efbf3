//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 存储后端选择。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// 内存后端（演示与测试）。
    Memory,
    /// sled 嵌入式持久化后端。
    Sled,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    /// sled 后端的数据目录（backend=sled 时必填）。
    pub data_dir: Option<String>,
    /// 审计日志保留上限。
    pub audit_log_cap: usize,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage_backend = match env::var("CSMS_STORAGE_BACKEND") {
            Ok(value) => match value.to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "sled" => StorageBackend::Sled,
                _ => {
                    return Err(ConfigError::Invalid(
                        "CSMS_STORAGE_BACKEND".to_string(),
                        value,
                    ));
                }
            },
            Err(_) => StorageBackend::Memory,
        };
        let data_dir = read_optional("CSMS_DATA_DIR");
        if storage_backend == StorageBackend::Sled && data_dir.is_none() {
            return Err(ConfigError::Missing("CSMS_DATA_DIR".to_string()));
        }
        let audit_log_cap = read_usize_with_default("CSMS_AUDIT_LOG_CAP", 1000)?;

        Ok(Self {
            storage_backend,
            data_dir,
            audit_log_cap,
        })
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_usize_with_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<usize>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}
