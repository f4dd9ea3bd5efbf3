//! 注册流程服务
//!
//! 邮箱注册直接建档；手机号注册先把资料押在临时存储
//! （`signupData`），OTP 验证通过后才建档。口令按系统配置的
//! 最小长度校验，入库前哈希。

use crate::audit::AuditRecorder;
use crate::ServiceError;
use api_contract::{EmailSignupRequest, PhoneSignupRequest};
use csms_auth::{AuthError, OtpChallenge, OtpFlow, OtpGuard, OtpPurpose, hash_password};
use csms_storage::clock::{now_epoch_ms, now_iso};
use csms_storage::{
    EphemeralStore, KEY_SIGNUP_DATA, KeyValueStore, SystemConfigCollection, UserCollection,
    UserRecord, UserStatus, read_ephemeral_json, write_ephemeral_json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 押在临时存储中的注册资料。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PendingSignup {
    first_name: String,
    last_name: String,
    phone: String,
    password: String,
    is_admin: bool,
    timestamp: i64,
}

/// 注册流程服务。
#[derive(Clone)]
pub struct SignupService {
    users: UserCollection,
    config: SystemConfigCollection,
    ephemeral: Arc<dyn EphemeralStore>,
    otp: OtpFlow,
    recorder: AuditRecorder,
}

impl SignupService {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn EphemeralStore>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            users: UserCollection::new(Arc::clone(&kv)),
            config: SystemConfigCollection::new(kv),
            otp: OtpFlow::new(Arc::clone(&ephemeral), OtpPurpose::Signup),
            ephemeral,
            recorder,
        }
    }

    /// 邮箱注册：唯一性由用户集合校验，成功后引导回登录页。
    pub async fn email_signup(
        &self,
        request: EmailSignupRequest,
    ) -> Result<UserRecord, ServiceError> {
        if !request.agree_terms {
            return Err(ServiceError::Validation(
                "please agree to terms and conditions".to_string(),
            ));
        }
        if request.password != request.confirm_password {
            return Err(ServiceError::Validation("passwords do not match".to_string()));
        }
        self.check_password_length(&request.password).await?;

        let record = UserRecord {
            id: 0,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            name: format!("{} {}", request.first_name, request.last_name),
            username: Some(request.username),
            email: Some(request.email.clone()),
            phone: request.phone.filter(|phone| !phone.is_empty()),
            password: hash_password(&request.password)?,
            is_admin: request.is_admin,
            status: UserStatus::Active,
            department: None,
            badge_number: None,
            created_at: String::new(),
            last_login: None,
            verified_phone: None,
        };

        let added = self.users.add(record).await?;
        self.recorder
            .record(
                "user_created",
                "Email Signup",
                format!("New user registered: {}", request.email),
            )
            .await;
        Ok(added)
    }

    /// 手机号注册第一步：校验资料、押入临时存储并下发 OTP。
    pub async fn phone_signup_start(
        &self,
        request: PhoneSignupRequest,
        now_ms: i64,
    ) -> Result<(OtpChallenge, OtpGuard), ServiceError> {
        if !request.agree_terms {
            return Err(ServiceError::Validation(
                "please agree to terms and conditions".to_string(),
            ));
        }
        for (field, value) in [
            ("first name", &request.first_name),
            ("last name", &request.last_name),
            ("phone number", &request.phone_number),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::Validation(format!("{field} is required")));
            }
        }
        if request.phone_number.len() < 10 {
            return Err(ServiceError::Validation(
                "please enter a valid phone number".to_string(),
            ));
        }
        self.check_password_length(&request.password).await?;

        let phone = format!("{}{}", request.country_code, request.phone_number);
        if self.users.find_by_phone(&phone).await?.is_some() {
            return Err(ServiceError::Validation(
                "phone number already registered".to_string(),
            ));
        }

        let pending = PendingSignup {
            first_name: request.first_name,
            last_name: request.last_name,
            phone: phone.clone(),
            password: request.password,
            is_admin: request.is_admin,
            timestamp: now_epoch_ms(),
        };
        write_ephemeral_json(self.ephemeral.as_ref(), KEY_SIGNUP_DATA, &pending)?;

        Ok(self.otp.send(&phone, now_ms)?)
    }

    /// 手机号注册第二步：OTP 验证通过后建档。
    ///
    /// 第 3 次输错锁定时连注册资料一起清除，流程必须从头再来。
    pub async fn phone_signup_verify(
        &self,
        code: &str,
        now_ms: i64,
    ) -> Result<UserRecord, ServiceError> {
        let phone = match self.otp.verify(code, now_ms) {
            Ok(phone) => phone,
            Err(err @ (AuthError::OtpLocked | AuthError::OtpExpired)) => {
                self.ephemeral.remove(KEY_SIGNUP_DATA);
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };

        let Some(pending) =
            read_ephemeral_json::<PendingSignup>(self.ephemeral.as_ref(), KEY_SIGNUP_DATA)?
        else {
            return Err(ServiceError::Validation(
                "session expired, please start again".to_string(),
            ));
        };

        // 用户名由手机号后六位生成
        let digits: String = pending.phone.chars().filter(char::is_ascii_digit).collect();
        let suffix = &digits[digits.len().saturating_sub(6)..];
        let record = UserRecord {
            id: 0,
            first_name: pending.first_name.clone(),
            last_name: pending.last_name.clone(),
            name: format!("{} {}", pending.first_name, pending.last_name),
            username: Some(format!("user_{suffix}")),
            email: None,
            phone: Some(phone.clone()),
            password: hash_password(&pending.password)?,
            is_admin: pending.is_admin,
            status: UserStatus::Active,
            department: None,
            badge_number: None,
            created_at: now_iso(),
            last_login: None,
            verified_phone: Some(true),
        };

        let added = self.users.add(record).await?;
        self.ephemeral.remove(KEY_SIGNUP_DATA);
        self.recorder
            .record(
                "user_created",
                "Phone Signup",
                format!("New user registered via phone: {phone}"),
            )
            .await;
        Ok(added)
    }

    /// 重发注册 OTP。
    pub fn phone_signup_resend(&self, now_ms: i64) -> Result<OtpChallenge, ServiceError> {
        Ok(self.otp.resend(now_ms)?)
    }

    /// 返回资料填写步：清掉 OTP 与押存的注册资料。
    pub fn phone_signup_cancel(&self) {
        self.otp.cancel();
        self.ephemeral.remove(KEY_SIGNUP_DATA);
    }

    /// 找回口令请求（真实投递是外部协作方；这里只校验并审计）。
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ServiceError> {
        if self.users.find_by_email(email).await?.is_none() {
            return Err(ServiceError::NotFound("email not found".to_string()));
        }
        tracing::info!(email, "password reset requested");
        self.recorder
            .record(
                "password_reset_requested",
                "Password Reset",
                format!("Reset requested for: {email}"),
            )
            .await;
        Ok(())
    }

    async fn check_password_length(&self, password: &str) -> Result<(), ServiceError> {
        let min = self.config.get().await?.password_min_length;
        if password.len() < min {
            return Err(ServiceError::Validation(format!(
                "password must be at least {min} characters"
            )));
        }
        Ok(())
    }
}
