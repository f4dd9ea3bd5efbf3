//! 查询能力：集合快照上的过滤、排序与统计聚合。
//!
//! 全部为无状态纯函数：输入整份集合快照与筛选条件，
//! 返回新的有序序列，从不修改输入。

pub mod analytics;

pub use analytics::*;

use chrono::NaiveDate;
use csms_storage::clock::parse_iso;
use csms_storage::{ReportStatus, SeizureReportRecord, UserRecord, UserStatus};

/// 报告状态筛选。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ReportStatus),
}

/// 用户角色筛选。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Admin,
    Officer,
}

/// 用户状态筛选。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserStatusFilter {
    #[default]
    All,
    Only(UserStatus),
}

/// 报告筛选条件。
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: StatusFilter,
    /// 大小写不敏感，匹配 车牌号 + 地点 + 提交人 的拼接。
    pub search: Option<String>,
    pub reason: Option<String>,
    /// 闭区间下界（按 submittedAt 的日期部分比较）。
    pub date_from: Option<NaiveDate>,
    /// 闭区间上界。
    pub date_to: Option<NaiveDate>,
}

/// 用户筛选条件。
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: RoleFilter,
    pub status: UserStatusFilter,
    /// 大小写不敏感，匹配 姓名 + 邮箱 的拼接。
    pub search: Option<String>,
}

/// 过滤报告并按 submittedAt 降序排序（稳定排序，同时间保持插入顺序）。
pub fn filter_reports(
    reports: &[SeizureReportRecord],
    filter: &ReportFilter,
) -> Vec<SeizureReportRecord> {
    let mut matched: Vec<SeizureReportRecord> = reports
        .iter()
        .filter(|report| report_matches(report, filter))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    matched
}

fn report_matches(report: &SeizureReportRecord, filter: &ReportFilter) -> bool {
    if let StatusFilter::Only(status) = filter.status {
        if report.status != status {
            return false;
        }
    }

    if let Some(reason) = filter.reason.as_deref() {
        if report.seizure_details.reason != reason {
            return false;
        }
    }

    if let Some(search) = filter.search.as_deref() {
        let needle = search.to_lowercase();
        if !needle.is_empty() {
            let haystack = format!(
                "{} {} {}",
                report.vehicle_info.number,
                report.seizure_details.location,
                report.submitted_by
            )
            .to_lowercase();
            if !haystack.contains(&needle) {
                return false;
            }
        }
    }

    if filter.date_from.is_some() || filter.date_to.is_some() {
        let Some(submitted) = parse_iso(&report.submitted_at) else {
            return false;
        };
        let date = submitted.date_naive();
        if let Some(from) = filter.date_from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = filter.date_to {
            if date > to {
                return false;
            }
        }
    }

    true
}

/// 过滤用户（保持插入顺序）。
pub fn filter_users(users: &[UserRecord], filter: &UserFilter) -> Vec<UserRecord> {
    users
        .iter()
        .filter(|user| user_matches(user, filter))
        .cloned()
        .collect()
}

fn user_matches(user: &UserRecord, filter: &UserFilter) -> bool {
    match filter.role {
        RoleFilter::All => {}
        RoleFilter::Admin => {
            if !user.is_admin {
                return false;
            }
        }
        RoleFilter::Officer => {
            if user.is_admin {
                return false;
            }
        }
    }

    if let UserStatusFilter::Only(status) = filter.status {
        if user.status != status {
            return false;
        }
    }

    if let Some(search) = filter.search.as_deref() {
        let needle = search.to_lowercase();
        if !needle.is_empty() {
            let haystack = format!("{} {}", user.name, user.email.as_deref().unwrap_or(""))
                .to_lowercase();
            if !haystack.contains(&needle) {
                return false;
            }
        }
    }

    true
}
