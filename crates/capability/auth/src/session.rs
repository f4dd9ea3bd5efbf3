//! 会话门禁
//!
//! 解析“当前用户”、执行登录/登出、做基于角色的页面访问判定。
//! 会话即 `currentUser` 键下的完整用户记录；登出清除该键与
//! 全部临时（标签页作用域）状态。

use crate::password::verify_password_and_maybe_upgrade;
use crate::AuthError;
use csms_storage::clock::now_iso;
use csms_storage::{
    AuditLogCollection, AuditLogEntry, EphemeralStore, KEY_CURRENT_USER, KEY_REMEMBERED_USER,
    KeyValueStore, UserCollection, UserRecord, read_json, write_json,
};
use domain::{Access, Page, Role, SessionContext, check_access};
use std::sync::Arc;

/// 会话状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Officer,
    Admin,
}

/// 会话门禁。
#[derive(Clone)]
pub struct SessionGate {
    kv: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn EphemeralStore>,
    users: UserCollection,
    audit: AuditLogCollection,
}

impl SessionGate {
    pub fn new(kv: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn EphemeralStore>) -> Self {
        Self {
            users: UserCollection::new(Arc::clone(&kv)),
            audit: AuditLogCollection::new(Arc::clone(&kv)),
            kv,
            ephemeral,
        }
    }

    /// 邮箱/用户名 + 口令登录。
    ///
    /// 成功后盖 `lastLogin`、把完整用户记录写入会话键；
    /// 历史明文口令在此处升级为 argon2 哈希。
    /// 勾选“记住我”时保存登录标识。
    pub async fn login_with_password(
        &self,
        identifier: &str,
        password: &str,
        remember: bool,
    ) -> Result<UserRecord, AuthError> {
        let Some(user) = self.users.find_by_identifier(identifier).await? else {
            csms_telemetry::record_login_failure();
            tracing::info!(identifier, "login rejected: unknown identifier");
            return Err(AuthError::InvalidCredentials);
        };

        let check = verify_password_and_maybe_upgrade(&user.password, password)?;
        if !check.verified {
            csms_telemetry::record_login_failure();
            tracing::info!(identifier, "login rejected: bad password");
            return Err(AuthError::InvalidCredentials);
        }
        if let Some(upgrade_hash) = check.upgrade_hash {
            self.users.set_password(user.id, &upgrade_hash).await?;
        }

        if remember {
            write_json(self.kv.as_ref(), KEY_REMEMBERED_USER, &identifier).await?;
        }

        let details = format!("User logged in: {identifier}");
        self.open_session(user.id, "Email/Username Login", details)
            .await
    }

    /// 手机号登录（OTP 已验证通过后调用）。
    pub async fn login_with_phone(&self, phone: &str) -> Result<UserRecord, AuthError> {
        let Some(user) = self.users.find_by_phone(phone).await? else {
            csms_telemetry::record_login_failure();
            return Err(AuthError::PhoneNotRegistered);
        };
        let details = format!("User logged in via phone: {phone}");
        self.open_session(user.id, "Phone Login", details).await
    }

    async fn open_session(
        &self,
        user_id: i64,
        resource: &str,
        details: String,
    ) -> Result<UserRecord, AuthError> {
        self.users.record_login(user_id, &now_iso()).await?;
        let user = self
            .users
            .find(user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("user vanished during login".to_string()))?;
        write_json(self.kv.as_ref(), KEY_CURRENT_USER, &user).await?;

        // 会话已建立，审计以该用户身份落账（尽力而为）
        let entry = AuditLogEntry::new(user.id, "login_success")
            .with_resource(resource)
            .with_details(details);
        if let Err(err) = self.audit.append(entry).await {
            tracing::warn!(error = %err, "audit append skipped");
        }
        csms_telemetry::record_login_success();
        tracing::info!(user_id = user.id, is_admin = user.is_admin, "session opened");
        Ok(user)
    }

    /// 当前会话用户（会话键缺失即匿名）。
    pub async fn current_user(&self) -> Result<Option<UserRecord>, AuthError> {
        Ok(read_json(self.kv.as_ref(), KEY_CURRENT_USER).await?)
    }

    /// 当前会话上下文（服务层审计用）。
    pub async fn session_context(&self) -> Result<Option<SessionContext>, AuthError> {
        Ok(self.current_user().await?.map(|user| {
            SessionContext::new(
                user.id,
                user.name.clone(),
                if user.is_admin {
                    Role::Admin
                } else {
                    Role::Officer
                },
            )
        }))
    }

    /// 会话状态。
    pub async fn session_state(&self) -> Result<SessionState, AuthError> {
        Ok(match self.current_user().await? {
            None => SessionState::Anonymous,
            Some(user) if user.is_admin => SessionState::Admin,
            Some(_) => SessionState::Officer,
        })
    }

    /// 页面访问判定（匿名 → 登录页；非管理员访问管理页 → 警员工作台）。
    pub async fn check_page_access(&self, page: Page) -> Result<Access, AuthError> {
        let role = self.current_user().await?.map(|user| {
            if user.is_admin {
                Role::Admin
            } else {
                Role::Officer
            }
        });
        Ok(check_access(page, role))
    }

    /// 登出：审计落账（有会话时）、清除会话键与全部临时状态。
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Some(user) = self.current_user().await? {
            let identity = user
                .email
                .clone()
                .or(user.username.clone())
                .or(user.phone.clone())
                .unwrap_or_else(|| user.name.clone());
            let entry = AuditLogEntry::new(user.id, "logout")
                .with_resource("User Logout")
                .with_details(format!("User logged out: {identity}"));
            if let Err(err) = self.audit.append(entry).await {
                tracing::warn!(error = %err, "audit append skipped");
            }
        }
        self.kv.remove(KEY_CURRENT_USER).await?;
        self.ephemeral.clear();
        Ok(())
    }

    /// “记住我”保存的登录标识。
    pub async fn remembered_identifier(&self) -> Result<Option<String>, AuthError> {
        Ok(read_json(self.kv.as_ref(), KEY_REMEMBERED_USER).await?)
    }

    /// 集合为空时创建引导管理员（应用启动时调用）。
    pub async fn ensure_default_admin(&self) -> Result<(), AuthError> {
        Ok(self.users.ensure_default_admin().await?)
    }
}
