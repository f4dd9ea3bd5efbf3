//! 业务服务能力：报告、缴费、用户管理、系统配置与注册流程。
//!
//! 每个服务组合集合、会话门禁与审计记录器：
//! 操作者身份从会话解析（不读任何全局状态），
//! 每次成功的变更之后尽力而为地追加一条审计记录
//! （解析不到当前用户时静默跳过）。

mod audit;
mod config;
mod payments;
mod reports;
mod signup;
mod users;

pub use audit::AuditRecorder;
pub use config::ConfigService;
pub use payments::PaymentService;
pub use reports::ReportService;
pub use signup::SignupService;
pub use users::UserAdminService;

use csms_auth::{AuthError, SessionGate};
use csms_storage::{EphemeralStore, KeyValueStore, StorageError};
use domain::SessionContext;
use std::sync::Arc;

/// 服务层错误。
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    Permission(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(message) => Self::Validation(message),
            StorageError::NotFound(message) => Self::NotFound(message),
            other => Self::Storage(other.to_string()),
        }
    }
}

/// 解析当前会话，要求已登录。
pub(crate) async fn require_session(gate: &SessionGate) -> Result<SessionContext, ServiceError> {
    gate.session_context()
        .await?
        .ok_or_else(|| ServiceError::Permission("sign in required".to_string()))
}

/// 解析当前会话，要求管理员。
pub(crate) async fn require_admin(gate: &SessionGate) -> Result<SessionContext, ServiceError> {
    let ctx = require_session(gate).await?;
    if !ctx.is_admin() {
        return Err(ServiceError::Permission(
            "admin privileges required".to_string(),
        ));
    }
    Ok(ctx)
}

/// 装配好的全部服务（应用启动时构建一次）。
#[derive(Clone)]
pub struct AppServices {
    pub gate: SessionGate,
    pub reports: ReportService,
    pub payments: PaymentService,
    pub users: UserAdminService,
    pub config: ConfigService,
    pub signup: SignupService,
}

impl AppServices {
    pub fn new(kv: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn EphemeralStore>) -> Self {
        let gate = SessionGate::new(Arc::clone(&kv), Arc::clone(&ephemeral));
        let recorder = AuditRecorder::new(gate.clone(), Arc::clone(&kv));
        Self {
            reports: ReportService::new(Arc::clone(&kv), gate.clone(), recorder.clone()),
            payments: PaymentService::new(Arc::clone(&kv), gate.clone(), recorder.clone()),
            users: UserAdminService::new(Arc::clone(&kv), gate.clone(), recorder.clone()),
            config: ConfigService::new(Arc::clone(&kv), gate.clone(), recorder.clone()),
            signup: SignupService::new(kv, ephemeral, recorder),
            gate,
        }
    }
}
