//! 认证能力：口令校验、OTP 流程、会话门禁。

mod otp;
mod password;
mod session;

pub use otp::{
    OTP_MAX_ATTEMPTS, OTP_RESEND_COOLDOWN_MS, OTP_TTL_MS, OtpChallenge, OtpFlow, OtpGuard,
    OtpPurpose, OtpState,
};
pub use password::{PasswordCheck, hash_password, verify_password_and_maybe_upgrade};
pub use session::{SessionGate, SessionState};

use csms_storage::StorageError;

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("phone number not registered")]
    PhoneNotRegistered,
    #[error("please enter a valid phone number")]
    InvalidPhone,
    #[error("no otp issued")]
    OtpMissing,
    #[error("otp expired")]
    OtpExpired,
    #[error("invalid otp, {remaining} attempts remaining")]
    OtpMismatch { remaining: u32 },
    #[error("too many failed attempts, request a new otp")]
    OtpLocked,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        Self::Internal(err.to_string())
    }
}
