//! 用户集合
//!
//! 对 `users` 键的类型化封装：
//! - 整体读写（插入顺序保持）
//! - 新增时校验必填字段与 username/email/phone 唯一性
//! - id 从 epoch 毫秒派生，同毫秒写入时单调递增补位
//! - 集合为空时自动创建引导管理员（id=1，用户名 admin）

use crate::clock::{now_epoch_ms, now_iso};
use crate::error::StorageError;
use crate::keys::KEY_USERS;
use crate::models::{UserPatch, UserRecord, UserStatus};
use crate::traits::{KeyValueStore, read_json, write_json};
use crate::validation::ensure_required;
use std::sync::Arc;

/// 引导管理员的初始口令（首次登录成功后升级为哈希）。
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// 用户集合。
#[derive(Clone)]
pub struct UserCollection {
    kv: Arc<dyn KeyValueStore>,
}

impl UserCollection {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// 读取整个集合（键缺失视为空集合）。
    pub async fn all(&self) -> Result<Vec<UserRecord>, StorageError> {
        Ok(read_json(self.kv.as_ref(), KEY_USERS)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, users: &[UserRecord]) -> Result<(), StorageError> {
        write_json(self.kv.as_ref(), KEY_USERS, &users).await
    }

    /// 集合为空时创建引导管理员；已存在任何用户则不做任何事。
    pub async fn ensure_default_admin(&self) -> Result<(), StorageError> {
        let users = self.all().await?;
        if !users.is_empty() {
            return Ok(());
        }
        let admin = UserRecord {
            id: 1,
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            name: "Admin User".to_string(),
            username: Some("admin".to_string()),
            email: Some("admin@carseizure.com".to_string()),
            phone: Some("+919876543210".to_string()),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
            is_admin: true,
            status: UserStatus::Active,
            department: None,
            badge_number: None,
            created_at: now_iso(),
            last_login: None,
            verified_phone: None,
        };
        tracing::info!(username = "admin", "bootstrap admin account created");
        self.save(&[admin]).await
    }

    /// 新增用户。
    ///
    /// 校验：name/password 必填，email/username/phone 至少其一，
    /// 且三者各自在集合内唯一。`id == 0` 时分配单调递增的 epoch 毫秒 id，
    /// `created_at` 为空时补当前时刻。校验失败时集合保持不变。
    pub async fn add(&self, mut record: UserRecord) -> Result<UserRecord, StorageError> {
        ensure_required("name", &record.name)?;
        ensure_required("password", &record.password)?;
        let has_identifier = [&record.email, &record.username, &record.phone]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()));
        if !has_identifier {
            return Err(StorageError::validation(
                "one of email, username or phone is required",
            ));
        }

        let mut users = self.all().await?;
        for existing in &users {
            if both_present_equal(&existing.username, &record.username) {
                return Err(StorageError::validation("username already taken"));
            }
            if both_present_equal(&existing.email, &record.email) {
                return Err(StorageError::validation("email already registered"));
            }
            if both_present_equal(&existing.phone, &record.phone) {
                return Err(StorageError::validation("phone already registered"));
            }
        }

        if record.id == 0 {
            let last = users.iter().map(|user| user.id).max().unwrap_or(0);
            record.id = now_epoch_ms().max(last + 1);
        } else if users.iter().any(|user| user.id == record.id) {
            return Err(StorageError::validation(format!(
                "user id {} already exists",
                record.id
            )));
        }
        if record.created_at.is_empty() {
            record.created_at = now_iso();
        }

        users.push(record.clone());
        self.save(&users).await?;
        Ok(record)
    }

    /// 合并更新指定用户并整体回写。
    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<UserRecord, StorageError> {
        let mut users = self.all().await?;
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| StorageError::not_found(format!("user {id}")))?;

        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(username) = patch.username {
            user.username = Some(username);
        }
        if let Some(email) = patch.email {
            user.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            user.phone = Some(phone);
        }
        if let Some(password) = patch.password {
            user.password = password;
        }
        if let Some(is_admin) = patch.is_admin {
            user.is_admin = is_admin;
        }
        if let Some(status) = patch.status {
            user.status = status;
        }
        if let Some(department) = patch.department {
            user.department = Some(department);
        }
        if let Some(badge_number) = patch.badge_number {
            user.badge_number = Some(badge_number);
        }

        let updated = user.clone();
        self.save(&users).await?;
        Ok(updated)
    }

    /// 删除用户（仅用户集合支持硬删除）。
    pub async fn remove(&self, id: i64) -> Result<(), StorageError> {
        let mut users = self.all().await?;
        let before = users.len();
        users.retain(|user| user.id != id);
        if users.len() == before {
            return Err(StorageError::not_found(format!("user {id}")));
        }
        self.save(&users).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.all().await?.into_iter().find(|user| user.id == id))
    }

    /// 按谓词查找第一个匹配的用户。
    pub async fn find_where(
        &self,
        predicate: impl Fn(&UserRecord) -> bool,
    ) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.all().await?.into_iter().find(|user| predicate(user)))
    }

    /// 按谓词过滤（保持插入顺序）。
    pub async fn filter_where(
        &self,
        predicate: impl Fn(&UserRecord) -> bool,
    ) -> Result<Vec<UserRecord>, StorageError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|user| predicate(user))
            .collect())
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .find(|user| user.username.as_deref() == Some(username)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .find(|user| user.email.as_deref() == Some(email)))
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .find(|user| user.phone.as_deref() == Some(phone)))
    }

    /// 按登录标识（email 或 username）查找。
    pub async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.all().await?.into_iter().find(|user| {
            user.email.as_deref() == Some(identifier)
                || user.username.as_deref() == Some(identifier)
        }))
    }

    /// 记录登录时刻（lastLogin）。
    pub async fn record_login(&self, id: i64, when_iso: &str) -> Result<(), StorageError> {
        let mut users = self.all().await?;
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| StorageError::not_found(format!("user {id}")))?;
        user.last_login = Some(when_iso.to_string());
        self.save(&users).await
    }

    /// 替换口令存储值（明文升级为哈希时使用）。
    pub async fn set_password(&self, id: i64, password: &str) -> Result<(), StorageError> {
        let mut users = self.all().await?;
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| StorageError::not_found(format!("user {id}")))?;
        user.password = password.to_string();
        self.save(&users).await
    }
}

fn both_present_equal(a: &Option<String>, b: &Option<String>) -> bool {
    match (a.as_deref(), b.as_deref()) {
        (Some(a), Some(b)) => !a.trim().is_empty() && a == b,
        _ => false,
    }
}
