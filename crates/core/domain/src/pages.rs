//! 页面标识与访问策略。
//!
//! 源实现把页面权限写死在 `checkAuthentication` 的文件名列表里；
//! 这里抽成显式的策略表，渲染层只负责跳转。

use crate::Role;

/// 应用内的页面标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// 登录/注册入口页。
    Login,
    /// 警员工作台（报告提交）。
    UserDashboard,
    /// 管理员工作台（报告审阅）。
    AdminDashboard,
    UserManagement,
    SystemConfig,
    ReportManagement,
    AuditTrail,
    Analytics,
}

/// 页面访问所需的最低角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    None,
    Officer,
    Admin,
}

/// 访问判定结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// 拒绝并给出跳转目标页。
    Denied { redirect: Page },
}

/// 页面访问策略表。
pub fn required_role(page: Page) -> RequiredRole {
    match page {
        Page::Login => RequiredRole::None,
        Page::UserDashboard => RequiredRole::Officer,
        Page::AdminDashboard
        | Page::UserManagement
        | Page::SystemConfig
        | Page::ReportManagement
        | Page::AuditTrail
        | Page::Analytics => RequiredRole::Admin,
    }
}

/// 判定给定角色（None 表示匿名）能否访问页面。
///
/// - 匿名访问任何工作台页面 → 跳转登录页
/// - 非管理员访问管理员页面 → 跳转警员工作台
pub fn check_access(page: Page, role: Option<Role>) -> Access {
    match required_role(page) {
        RequiredRole::None => Access::Granted,
        RequiredRole::Officer => match role {
            Some(_) => Access::Granted,
            None => Access::Denied {
                redirect: Page::Login,
            },
        },
        RequiredRole::Admin => match role {
            Some(Role::Admin) => Access::Granted,
            Some(Role::Officer) => Access::Denied {
                redirect: Page::UserDashboard,
            },
            None => Access::Denied {
                redirect: Page::Login,
            },
        },
    }
}
