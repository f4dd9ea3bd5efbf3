//! 系统配置服务（管理面，全部操作要求管理员）。

use crate::audit::AuditRecorder;
use crate::{ServiceError, require_admin};
use api_contract::ConfigUpdateRequest;
use csms_auth::SessionGate;
use csms_storage::{ConfigPatch, KeyValueStore, SystemConfigCollection, SystemConfigRecord};
use std::sync::Arc;

/// 系统配置服务。
#[derive(Clone)]
pub struct ConfigService {
    config: SystemConfigCollection,
    gate: SessionGate,
    recorder: AuditRecorder,
}

impl ConfigService {
    pub fn new(kv: Arc<dyn KeyValueStore>, gate: SessionGate, recorder: AuditRecorder) -> Self {
        Self {
            config: SystemConfigCollection::new(kv),
            gate,
            recorder,
        }
    }

    /// 读取配置（配置页加载；键缺失回落默认值）。
    pub async fn get(&self) -> Result<SystemConfigRecord, ServiceError> {
        require_admin(&self.gate).await?;
        Ok(self.config.get().await?)
    }

    /// 保存配置表单（标量字段整体覆盖，列表字段不受影响）。
    pub async fn save(
        &self,
        request: ConfigUpdateRequest,
    ) -> Result<SystemConfigRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let updated = self
            .config
            .update(ConfigPatch {
                system_name: Some(request.system_name),
                organization_name: Some(request.organization_name),
                contact_email: Some(request.contact_email),
                timezone: Some(request.timezone),
                email_notifications: Some(request.email_notifications),
                sms_notifications: Some(request.sms_notifications),
                push_notifications: Some(request.push_notifications),
                notification_frequency: Some(request.notification_frequency),
                session_timeout: Some(request.session_timeout),
                password_min_length: Some(request.password_min_length),
                require_password_change: Some(request.require_password_change),
                enable_audit_log: Some(request.enable_audit_log),
                data_retention: Some(request.data_retention),
                backup_frequency: Some(request.backup_frequency),
            })
            .await?;
        self.recorder
            .record(
                "config_updated",
                "System Configuration",
                "System settings modified",
            )
            .await;
        Ok(updated)
    }

    pub async fn add_vehicle_type(&self, value: &str) -> Result<SystemConfigRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let updated = self.config.add_vehicle_type(value).await?;
        self.recorder
            .record(
                "config_updated",
                "System Configuration",
                format!("Vehicle type added: {value}"),
            )
            .await;
        Ok(updated)
    }

    pub async fn remove_vehicle_type(
        &self,
        value: &str,
    ) -> Result<SystemConfigRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let updated = self.config.remove_vehicle_type(value).await?;
        self.recorder
            .record(
                "config_updated",
                "System Configuration",
                format!("Vehicle type removed: {value}"),
            )
            .await;
        Ok(updated)
    }

    pub async fn add_seizure_reason(
        &self,
        value: &str,
    ) -> Result<SystemConfigRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let updated = self.config.add_seizure_reason(value).await?;
        self.recorder
            .record(
                "config_updated",
                "System Configuration",
                format!("Seizure reason added: {value}"),
            )
            .await;
        Ok(updated)
    }

    pub async fn remove_seizure_reason(
        &self,
        value: &str,
    ) -> Result<SystemConfigRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let updated = self.config.remove_seizure_reason(value).await?;
        self.recorder
            .record(
                "config_updated",
                "System Configuration",
                format!("Seizure reason removed: {value}"),
            )
            .await;
        Ok(updated)
    }

    /// 恢复默认配置。
    pub async fn reset(&self) -> Result<SystemConfigRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let reset = self.config.reset().await?;
        self.recorder
            .record(
                "config_reset",
                "System Configuration",
                "System configuration reset to defaults",
            )
            .await;
        Ok(reset)
    }
}
