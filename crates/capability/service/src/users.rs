//! 用户管理服务（管理面，全部操作要求管理员）。

use crate::audit::AuditRecorder;
use crate::{ServiceError, require_admin};
use api_contract::UserUpsertRequest;
use csms_auth::{SessionGate, hash_password};
use csms_query::{UserFilter, filter_users};
use csms_storage::{
    KeyValueStore, ReportCollection, UserCollection, UserPatch, UserRecord, UserStatus,
};
use std::collections::HashMap;
use std::sync::Arc;

/// 用户管理服务。
#[derive(Clone)]
pub struct UserAdminService {
    users: UserCollection,
    reports: ReportCollection,
    gate: SessionGate,
    recorder: AuditRecorder,
}

impl UserAdminService {
    pub fn new(kv: Arc<dyn KeyValueStore>, gate: SessionGate, recorder: AuditRecorder) -> Self {
        Self {
            users: UserCollection::new(Arc::clone(&kv)),
            reports: ReportCollection::new(kv),
            gate,
            recorder,
        }
    }

    /// 新增用户（口令必填并哈希后入库）。
    pub async fn create(&self, request: UserUpsertRequest) -> Result<UserRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let Some(password) = request
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
        else {
            return Err(ServiceError::Validation("password is required".to_string()));
        };

        let (first_name, last_name) = split_name(&request.name);
        let record = UserRecord {
            id: 0,
            first_name,
            last_name,
            name: request.name.clone(),
            username: None,
            email: Some(request.email.clone()),
            phone: None,
            password: hash_password(password)?,
            is_admin: request.is_admin,
            status: UserStatus::Active,
            department: normalize(request.department),
            badge_number: normalize(request.badge_number),
            created_at: String::new(),
            last_login: None,
            verified_phone: None,
        };

        let added = self.users.add(record).await?;
        self.recorder
            .record(
                "user_created",
                format!("User {}", added.email.as_deref().unwrap_or(&added.name)),
                "New user account created",
            )
            .await;
        Ok(added)
    }

    /// 编辑用户（口令可选，给出时哈希替换）。
    pub async fn update(
        &self,
        id: i64,
        request: UserUpsertRequest,
    ) -> Result<UserRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let (first_name, last_name) = split_name(&request.name);
        let password = match request
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
        {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let patch = UserPatch {
            first_name: Some(first_name),
            last_name: Some(last_name),
            name: Some(request.name),
            email: Some(request.email),
            password,
            is_admin: Some(request.is_admin),
            department: request.department,
            badge_number: request.badge_number,
            ..UserPatch::default()
        };

        let updated = self.users.update(id, patch).await?;
        self.recorder
            .record(
                "user_updated",
                format!("User {}", updated.email.as_deref().unwrap_or(&updated.name)),
                "User profile updated",
            )
            .await;
        Ok(updated)
    }

    /// 启用/停用切换。
    pub async fn toggle_status(&self, id: i64) -> Result<UserRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let user = self
            .users
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {id}")))?;
        let next = match user.status {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        };
        let updated = self
            .users
            .update(
                id,
                UserPatch {
                    status: Some(next),
                    ..UserPatch::default()
                },
            )
            .await?;
        self.recorder
            .record(
                "user_status_toggled",
                format!("User {}", updated.email.as_deref().unwrap_or(&updated.name)),
                format!("User status changed to {}", status_name(next)),
            )
            .await;
        Ok(updated)
    }

    /// 删除用户。不级联：该用户的报告保持原样（引用完整性由调用方负责）。
    pub async fn remove(&self, id: i64) -> Result<(), ServiceError> {
        require_admin(&self.gate).await?;
        let user = self
            .users
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {id}")))?;
        self.users.remove(id).await?;
        self.recorder
            .record(
                "user_deleted",
                format!("User {}", user.email.as_deref().unwrap_or(&user.name)),
                "User account deleted",
            )
            .await;
        Ok(())
    }

    /// 按条件过滤用户列表。
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<UserRecord>, ServiceError> {
        require_admin(&self.gate).await?;
        Ok(filter_users(&self.users.all().await?, filter))
    }

    /// 每个用户提交的报告数（用户列表的报告列）。
    pub async fn report_counts(&self) -> Result<HashMap<i64, usize>, ServiceError> {
        require_admin(&self.gate).await?;
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for report in self.reports.all().await? {
            *counts.entry(report.submitted_by_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

fn split_name(name: &str) -> (String, String) {
    match name.trim().split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn status_name(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Active => "active",
        UserStatus::Inactive => "inactive",
    }
}
