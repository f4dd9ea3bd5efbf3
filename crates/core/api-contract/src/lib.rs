//! 稳定的表单 DTO 与 UI 通知契约。
//!
//! 渲染层把表单载荷按这里的 DTO 反序列化后交给 service 层；
//! 所有 JSON 字段名使用 camelCase，与既有持久化键空间保持一致。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// UI 通知封装（toast 的成功/失败消息体）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiNotice {
    pub success: bool,
    pub level: String,
    pub message: String,
}

impl UiNotice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            level: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            level: "error".to_string(),
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            success: true,
            level: "info".to_string(),
            message: message.into(),
        }
    }
}

/// 登录请求体（email/username + 口令）。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// 邮箱注册请求体。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub agree_terms: bool,
}

/// 手机号注册请求体（提交后进入 OTP 验证）。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneSignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone_number: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub agree_terms: bool,
}

/// 坐标载荷（定位提供者的原样结果）。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatesDto {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

/// 证件附件载荷。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDto {
    pub name: String,
    pub data: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// 扣押报告提交请求体。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub vehicle_make: String,
    pub vehicle_color: String,
    pub location: String,
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub coordinates: Option<CoordinatesDto>,
    /// 车辆照片（base64 data URI，必填）。
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentDto>,
}

/// 缴费录入请求体。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSubmission {
    pub vehicle_number: String,
    pub mobile_number: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    pub amount: f64,
    pub payment_type: String,
    pub payment_method: String,
    pub screenshot: String,
}

/// 管理面新增/编辑用户请求体。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpsertRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub badge_number: Option<String>,
}

/// 系统配置保存请求体（列表字段由专门的增删接口维护）。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdateRequest {
    pub system_name: String,
    pub organization_name: String,
    pub contact_email: String,
    pub timezone: String,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub push_notifications: bool,
    pub notification_frequency: String,
    pub session_timeout: u32,
    pub password_min_length: usize,
    pub require_password_change: bool,
    pub enable_audit_log: bool,
    pub data_retention: u32,
    pub backup_frequency: String,
}
