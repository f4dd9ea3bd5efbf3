pub mod pages;

pub use pages::{Access, Page, RequiredRole, check_access, required_role};

use serde::{Deserialize, Serialize};

/// 会话角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Officer,
    Admin,
}

/// 会话上下文：所有模块共享的执行上下文。
///
/// 替代源实现中散落的全局 `currentUser` 读取，显式传入各能力模块。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: i64,
    /// 展示名（审计与缴费记录中的操作者名）。
    pub display_name: String,
    pub role: Role,
}

impl SessionContext {
    /// 构造显式身份的会话上下文。
    pub fn new(user_id: i64, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
