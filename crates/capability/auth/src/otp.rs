//! OTP 验证流程
//!
//! 手机号登录/注册的一次性验证码，本地模拟真实短信服务商（外部协作方，
//! 真实部署必须替换）。源实现把流程状态散落在 DOM class 切换里，
//! 这里建模为显式状态机：
//!
//! AwaitingPhone → (send) → AwaitingCode → (verify 正确) → Verified
//!                              │ 超时 5 分钟 → Expired（记录清除）
//!                              │ 连续 3 次输错 → Locked（记录清除）
//!
//! 临时记录存放在标签页作用域存储（`currentOTP`/`signupOTP`），
//! 退出路径（成功、过期、锁定、返回上一步）都必须清除记录，
//! 重发倒计时通过 [`OtpChallenge::resend_available_at_ms`] 表达。

use crate::AuthError;
use csms_storage::{
    EphemeralStore, KEY_CURRENT_OTP, KEY_SIGNUP_OTP, read_ephemeral_json, write_ephemeral_json,
};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 验证码有效期：5 分钟。
pub const OTP_TTL_MS: i64 = 5 * 60 * 1000;
/// 允许的最大输错次数。
pub const OTP_MAX_ATTEMPTS: u32 = 3;
/// 重发冷却：30 秒。
pub const OTP_RESEND_COOLDOWN_MS: i64 = 30 * 1000;

/// OTP 用途（决定临时键名）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    Login,
    Signup,
}

impl OtpPurpose {
    fn key(self) -> &'static str {
        match self {
            OtpPurpose::Login => KEY_CURRENT_OTP,
            OtpPurpose::Signup => KEY_SIGNUP_OTP,
        }
    }
}

/// 流程状态。
///
/// `Verified` 与 `Locked` 是终结状态：临时记录已清除，
/// 只作为 [`OtpFlow::verify`] 的结果出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpState {
    AwaitingPhone,
    AwaitingCode,
    Verified,
    Expired,
    Locked,
}

/// 临时存储中的 OTP 记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OtpRecord {
    phone: String,
    code: String,
    issued_at_ms: i64,
    attempts: u32,
}

/// 下发结果。`code` 暴露给调用方以模拟短信投递（演示日志）。
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub phone: String,
    pub code: String,
    /// 重发按钮解锁时刻（epoch 毫秒）。
    pub resend_available_at_ms: i64,
}

/// OTP 流程。
#[derive(Clone)]
pub struct OtpFlow {
    ephemeral: Arc<dyn EphemeralStore>,
    purpose: OtpPurpose,
}

impl OtpFlow {
    pub fn new(ephemeral: Arc<dyn EphemeralStore>, purpose: OtpPurpose) -> Self {
        Self { ephemeral, purpose }
    }

    /// 为手机号下发验证码并进入 AwaitingCode。
    ///
    /// 返回的 [`OtpGuard`] 是作用域资源：未走到终结状态就被丢弃时
    /// （返回上一步、页面离开），临时记录随之清除。
    pub fn send(&self, phone: &str, now_ms: i64) -> Result<(OtpChallenge, OtpGuard), AuthError> {
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        if digits < 10 {
            return Err(AuthError::InvalidPhone);
        }
        let record = OtpRecord {
            phone: phone.to_string(),
            code: generate_code(),
            issued_at_ms: now_ms,
            attempts: 0,
        };
        write_ephemeral_json(self.ephemeral.as_ref(), self.purpose.key(), &record)?;
        csms_telemetry::record_otp_issued();
        tracing::info!(phone = %record.phone, "otp issued");
        Ok((
            OtpChallenge {
                phone: record.phone.clone(),
                code: record.code,
                resend_available_at_ms: now_ms + OTP_RESEND_COOLDOWN_MS,
            },
            OtpGuard {
                ephemeral: Arc::clone(&self.ephemeral),
                key: self.purpose.key(),
                armed: true,
            },
        ))
    }

    /// 当前状态（不改变存储）。
    pub fn state(&self, now_ms: i64) -> OtpState {
        match self.record() {
            Ok(Some(record)) => {
                if now_ms - record.issued_at_ms > OTP_TTL_MS {
                    OtpState::Expired
                } else if record.attempts >= OTP_MAX_ATTEMPTS {
                    OtpState::Locked
                } else {
                    OtpState::AwaitingCode
                }
            }
            _ => OtpState::AwaitingPhone,
        }
    }

    /// 校验输入的验证码。
    ///
    /// 成功返回通过验证的手机号并清除记录；过期与第 3 次输错
    /// 同样清除记录，此后即使输入正确也必须重新下发。
    pub fn verify(&self, code: &str, now_ms: i64) -> Result<String, AuthError> {
        let Some(mut record) = self.record()? else {
            return Err(AuthError::OtpMissing);
        };

        if now_ms - record.issued_at_ms > OTP_TTL_MS {
            self.ephemeral.remove(self.purpose.key());
            return Err(AuthError::OtpExpired);
        }

        if code == record.code {
            self.ephemeral.remove(self.purpose.key());
            csms_telemetry::record_otp_verified();
            return Ok(record.phone);
        }

        record.attempts += 1;
        if record.attempts >= OTP_MAX_ATTEMPTS {
            self.ephemeral.remove(self.purpose.key());
            csms_telemetry::record_otp_locked();
            return Err(AuthError::OtpLocked);
        }
        let remaining = OTP_MAX_ATTEMPTS - record.attempts;
        write_ephemeral_json(self.ephemeral.as_ref(), self.purpose.key(), &record)?;
        Err(AuthError::OtpMismatch { remaining })
    }

    /// 重发：换新码、重置输错计数、重开有效期。
    pub fn resend(&self, now_ms: i64) -> Result<OtpChallenge, AuthError> {
        let Some(mut record) = self.record()? else {
            return Err(AuthError::OtpMissing);
        };
        record.code = generate_code();
        record.issued_at_ms = now_ms;
        record.attempts = 0;
        write_ephemeral_json(self.ephemeral.as_ref(), self.purpose.key(), &record)?;
        csms_telemetry::record_otp_issued();
        Ok(OtpChallenge {
            phone: record.phone,
            code: record.code,
            resend_available_at_ms: now_ms + OTP_RESEND_COOLDOWN_MS,
        })
    }

    /// 主动取消（返回手机号输入步）。
    pub fn cancel(&self) {
        self.ephemeral.remove(self.purpose.key());
    }

    fn record(&self) -> Result<Option<OtpRecord>, AuthError> {
        Ok(read_ephemeral_json(
            self.ephemeral.as_ref(),
            self.purpose.key(),
        )?)
    }
}

/// OTP 会话守卫。
///
/// send 时获取，所有退出路径保证释放：verify 走到终结状态后调用
/// [`OtpGuard::disarm`]；守卫未解除就被丢弃（返回、导航离开）时，
/// Drop 清除临时记录，避免悬挂的验证码在状态变化后仍可用。
pub struct OtpGuard {
    ephemeral: Arc<dyn EphemeralStore>,
    key: &'static str,
    armed: bool,
}

impl std::fmt::Debug for OtpGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpGuard")
            .field("key", &self.key)
            .field("armed", &self.armed)
            .finish()
    }
}

impl OtpGuard {
    /// 流程已走到终结状态（Verified/Expired/Locked），解除守卫。
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for OtpGuard {
    fn drop(&mut self) {
        if self.armed {
            self.ephemeral.remove(self.key);
        }
    }
}

/// 生成 6 位数字验证码（100000–999999）。
fn generate_code() -> String {
    let n = OsRng.next_u32() % 900_000 + 100_000;
    n.to_string()
}
