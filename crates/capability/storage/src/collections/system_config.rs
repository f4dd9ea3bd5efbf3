//! 系统配置集合
//!
//! 对 `systemConfig` 单例键的类型化封装：
//! - 键缺失时回落到固定默认配置（读取不落盘）
//! - 车辆类型与扣押事由列表保持插入顺序、元素唯一

use crate::error::StorageError;
use crate::keys::KEY_SYSTEM_CONFIG;
use crate::models::{ConfigPatch, SystemConfigRecord};
use crate::traits::{KeyValueStore, read_json, write_json};
use std::sync::Arc;

/// 系统配置集合。
#[derive(Clone)]
pub struct SystemConfigCollection {
    kv: Arc<dyn KeyValueStore>,
}

impl SystemConfigCollection {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// 读取配置；键缺失时返回默认配置。
    pub async fn get(&self) -> Result<SystemConfigRecord, StorageError> {
        Ok(read_json(self.kv.as_ref(), KEY_SYSTEM_CONFIG)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, config: &SystemConfigRecord) -> Result<(), StorageError> {
        write_json(self.kv.as_ref(), KEY_SYSTEM_CONFIG, config).await
    }

    /// 合并更新标量配置项（列表字段见 add/remove 接口）。
    pub async fn update(&self, patch: ConfigPatch) -> Result<SystemConfigRecord, StorageError> {
        let mut config = self.get().await?;

        if let Some(system_name) = patch.system_name {
            config.system_name = system_name;
        }
        if let Some(organization_name) = patch.organization_name {
            config.organization_name = organization_name;
        }
        if let Some(contact_email) = patch.contact_email {
            config.contact_email = contact_email;
        }
        if let Some(timezone) = patch.timezone {
            config.timezone = timezone;
        }
        if let Some(email_notifications) = patch.email_notifications {
            config.email_notifications = email_notifications;
        }
        if let Some(sms_notifications) = patch.sms_notifications {
            config.sms_notifications = sms_notifications;
        }
        if let Some(push_notifications) = patch.push_notifications {
            config.push_notifications = push_notifications;
        }
        if let Some(notification_frequency) = patch.notification_frequency {
            config.notification_frequency = notification_frequency;
        }
        if let Some(session_timeout) = patch.session_timeout {
            config.session_timeout = session_timeout;
        }
        if let Some(password_min_length) = patch.password_min_length {
            config.password_min_length = password_min_length;
        }
        if let Some(require_password_change) = patch.require_password_change {
            config.require_password_change = require_password_change;
        }
        if let Some(enable_audit_log) = patch.enable_audit_log {
            config.enable_audit_log = enable_audit_log;
        }
        if let Some(data_retention) = patch.data_retention {
            config.data_retention = data_retention;
        }
        if let Some(backup_frequency) = patch.backup_frequency {
            config.backup_frequency = backup_frequency;
        }

        self.save(&config).await?;
        Ok(config)
    }

    /// 新增车辆类型（重复项报校验错误）。
    pub async fn add_vehicle_type(&self, value: &str) -> Result<SystemConfigRecord, StorageError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(StorageError::validation("vehicle type is required"));
        }
        let mut config = self.get().await?;
        if config.vehicle_types.iter().any(|item| item == value) {
            return Err(StorageError::validation("vehicle type already exists"));
        }
        config.vehicle_types.push(value.to_string());
        self.save(&config).await?;
        Ok(config)
    }

    /// 移除车辆类型（不存在时静默成功，与引导流程一致）。
    pub async fn remove_vehicle_type(
        &self,
        value: &str,
    ) -> Result<SystemConfigRecord, StorageError> {
        let mut config = self.get().await?;
        config.vehicle_types.retain(|item| item != value);
        self.save(&config).await?;
        Ok(config)
    }

    /// 新增扣押事由（重复项报校验错误）。
    pub async fn add_seizure_reason(
        &self,
        value: &str,
    ) -> Result<SystemConfigRecord, StorageError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(StorageError::validation("seizure reason is required"));
        }
        let mut config = self.get().await?;
        if config.seizure_reasons.iter().any(|item| item == value) {
            return Err(StorageError::validation("seizure reason already exists"));
        }
        config.seizure_reasons.push(value.to_string());
        self.save(&config).await?;
        Ok(config)
    }

    /// 移除扣押事由（不存在时静默成功）。
    pub async fn remove_seizure_reason(
        &self,
        value: &str,
    ) -> Result<SystemConfigRecord, StorageError> {
        let mut config = self.get().await?;
        config.seizure_reasons.retain(|item| item != value);
        self.save(&config).await?;
        Ok(config)
    }

    /// 重置为默认配置。
    pub async fn reset(&self) -> Result<SystemConfigRecord, StorageError> {
        let config = SystemConfigRecord::default();
        self.save(&config).await?;
        Ok(config)
    }
}
