//! 数据模型
//!
//! 定义所有持久化记录和更新结构：
//! - 用户模型：UserRecord, UserPatch
//! - 扣押报告模型：SeizureReportRecord, ReportPatch（含车辆信息、扣押明细、坐标、附件）
//! - 缴费模型：PaymentRecord, PaymentPatch（按车牌号分组存储）
//! - 审计日志模型：AuditLogEntry
//! - 系统配置模型：SystemConfigRecord, ConfigPatch
//!
//! 所有记录以 camelCase 字段名序列化，与既有持久化键空间逐字段兼容。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 用户状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// 报告状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
}

/// 报告优先级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    High,
    #[default]
    Medium,
    Low,
}

/// 用户记录。
///
/// `password` 字段存 argon2 哈希；历史数据中的明文在登录成功时升级为哈希。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// epoch 毫秒派生的 id（引导管理员固定为 1）。
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    pub is_admin: bool,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_number: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_phone: Option<bool>,
}

/// 用户更新输入。
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub status: Option<UserStatus>,
    pub department: Option<String>,
    pub badge_number: Option<String>,
}

/// GPS 坐标（定位提供者的原样结果）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoCoordinates {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

/// 车辆信息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub number: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub make: String,
    pub color: String,
}

/// 扣押明细。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeizureDetails {
    pub location: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// 证件附件（base64 data URI）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttachment {
    pub name: String,
    pub data: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// 扣押报告记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeizureReportRecord {
    /// `SR` + epoch 毫秒，全局唯一且随创建顺序单调递增。
    pub id: String,
    pub submitted_by: String,
    pub submitted_by_id: i64,
    pub submitted_at: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub priority: ReportPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoCoordinates>,
    pub vehicle_info: VehicleInfo,
    pub seizure_details: SeizureDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// 报告更新输入。
#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub status: Option<ReportStatus>,
    pub priority: Option<ReportPriority>,
    pub assigned_to: Option<i64>,
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

/// 缴费记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// `PAY` + epoch 毫秒。
    pub id: String,
    pub vehicle_number: String,
    /// 必须匹配 `^\d{10}$`。
    pub mobile_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    pub amount: f64,
    pub payment_type: String,
    pub payment_method: String,
    /// 缴费凭证截图（base64 data URI，必填）。
    pub screenshot: String,
    pub date: String,
    pub recorded_by: String,
    pub recorded_at: String,
}

/// 缴费更新输入（引导流程为只追加，更新仅供管理面使用）。
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub owner_name: Option<String>,
    pub amount: Option<f64>,
    pub payment_type: Option<String>,
    pub payment_method: Option<String>,
}

/// 按车牌号分组的缴费映射（每辆车按录入顺序保存列表）。
pub type PaymentMap = BTreeMap<String, Vec<PaymentRecord>>;

/// 审计日志记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// epoch 毫秒派生的 id。
    pub id: i64,
    pub timestamp: String,
    pub user_id: i64,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default = "default_severity")]
    pub severity: String,
    /// 客户端侧始终为 "localhost"。
    pub ip_address: String,
    #[serde(default = "default_audit_status")]
    pub status: String,
}

fn default_severity() -> String {
    "info".to_string()
}

fn default_audit_status() -> String {
    "success".to_string()
}

impl AuditLogEntry {
    /// 构造一条默认严重级/状态的审计记录（id 与时间戳由集合补齐）。
    pub fn new(user_id: i64, action: impl Into<String>) -> Self {
        Self {
            id: 0,
            timestamp: String::new(),
            user_id,
            action: action.into(),
            resource: None,
            details: None,
            severity: default_severity(),
            ip_address: "localhost".to_string(),
            status: default_audit_status(),
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }
}

/// 系统配置单例。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfigRecord {
    pub system_name: String,
    pub organization_name: String,
    pub contact_email: String,
    pub timezone: String,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub push_notifications: bool,
    pub notification_frequency: String,
    /// 会话超时（分钟）。
    pub session_timeout: u32,
    pub password_min_length: usize,
    pub require_password_change: bool,
    pub enable_audit_log: bool,
    /// 数据保留（天）。
    pub data_retention: u32,
    pub backup_frequency: String,
    /// 元素唯一，保持插入顺序。
    pub vehicle_types: Vec<String>,
    /// 元素唯一，保持插入顺序。
    pub seizure_reasons: Vec<String>,
}

impl Default for SystemConfigRecord {
    fn default() -> Self {
        Self {
            system_name: "Car Seizure Management System".to_string(),
            organization_name: "Traffic Police Department".to_string(),
            contact_email: "admin@traffic.gov".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            email_notifications: true,
            sms_notifications: false,
            push_notifications: true,
            notification_frequency: "immediate".to_string(),
            session_timeout: 60,
            password_min_length: 6,
            require_password_change: false,
            enable_audit_log: true,
            data_retention: 365,
            backup_frequency: "daily".to_string(),
            vehicle_types: ["car", "motorcycle", "truck", "bus", "auto"]
                .map(String::from)
                .to_vec(),
            seizure_reasons: [
                "no-documents",
                "traffic-violation",
                "illegal-parking",
                "accident",
                "other",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// 系统配置更新输入（列表字段由专门的增删接口维护）。
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    pub system_name: Option<String>,
    pub organization_name: Option<String>,
    pub contact_email: Option<String>,
    pub timezone: Option<String>,
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub notification_frequency: Option<String>,
    pub session_timeout: Option<u32>,
    pub password_min_length: Option<usize>,
    pub require_password_change: Option<bool>,
    pub enable_audit_log: Option<bool>,
    pub data_retention: Option<u32>,
    pub backup_frequency: Option<String>,
}
