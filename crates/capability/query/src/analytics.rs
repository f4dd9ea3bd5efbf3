//! 统计聚合
//!
//! 管理端分析页的数据来源：按月趋势、高发地点、事由/车型分布、
//! 平均处理时长与工作台概览统计。

use chrono::{Datelike, Utc};
use csms_storage::clock::parse_iso;
use csms_storage::{ReportStatus, SeizureReportRecord};
use std::collections::HashMap;

/// 工作台概览统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub total: usize,
    pub pending: usize,
    pub reviewed: usize,
    pub resolved: usize,
    /// 今日（UTC）提交数。
    pub submitted_today: usize,
}

/// 概览统计。
pub fn report_stats(reports: &[SeizureReportRecord]) -> ReportStats {
    let today = Utc::now().date_naive();
    let mut stats = ReportStats {
        total: reports.len(),
        ..ReportStats::default()
    };
    for report in reports {
        match report.status {
            ReportStatus::Pending => stats.pending += 1,
            ReportStatus::Reviewed => stats.reviewed += 1,
            ReportStatus::Resolved => stats.resolved += 1,
        }
        if parse_iso(&report.submitted_at).is_some_and(|dt| dt.date_naive() == today) {
            stats.submitted_today += 1;
        }
    }
    stats
}

/// 按月（YYYY-MM）聚合提交量，月份升序。
pub fn monthly_counts(reports: &[SeizureReportRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for report in reports {
        if let Some(dt) = parse_iso(&report.submitted_at) {
            let month = format!("{:04}-{:02}", dt.year(), dt.month());
            *counts.entry(month).or_insert(0) += 1;
        }
    }
    let mut months: Vec<(String, usize)> = counts.into_iter().collect();
    months.sort_by(|a, b| a.0.cmp(&b.0));
    months
}

/// 高发地点 Top-N（计数降序；计数相同按首次出现顺序）。
pub fn top_locations(reports: &[SeizureReportRecord], n: usize) -> Vec<(String, usize)> {
    count_by_first_seen(reports.iter().map(|report| {
        report.seizure_details.location.as_str()
    }))
    .into_iter()
    .take(n)
    .collect()
}

/// 按扣押事由聚合（计数降序；同计数按首次出现顺序）。
pub fn reason_counts(reports: &[SeizureReportRecord]) -> Vec<(String, usize)> {
    count_by_first_seen(
        reports
            .iter()
            .map(|report| report.seizure_details.reason.as_str()),
    )
}

/// 按车辆类型聚合（计数降序；同计数按首次出现顺序）。
pub fn vehicle_type_counts(reports: &[SeizureReportRecord]) -> Vec<(String, usize)> {
    count_by_first_seen(
        reports
            .iter()
            .map(|report| report.vehicle_info.vehicle_type.as_str()),
    )
}

fn count_by_first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        if !counts.contains_key(value) {
            order.push(value.to_string());
        }
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    // 稳定排序：同计数保持首次出现顺序
    let mut items: Vec<(String, usize)> = order
        .into_iter()
        .map(|key| {
            let count = counts.get(&key).copied().unwrap_or(0);
            (key, count)
        })
        .collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items
}

/// 平均处理时长（小时，四舍五入）。
///
/// 只统计已办结报告，取 `(updatedAt ?? submittedAt) - submittedAt` 的均值。
pub fn average_resolution_hours(reports: &[SeizureReportRecord]) -> i64 {
    let mut total_ms: i64 = 0;
    let mut count: i64 = 0;
    for report in reports {
        if report.status != ReportStatus::Resolved {
            continue;
        }
        let Some(submitted) = parse_iso(&report.submitted_at) else {
            continue;
        };
        let resolved = report
            .updated_at
            .as_deref()
            .and_then(parse_iso)
            .unwrap_or(submitted);
        total_ms += resolved.timestamp_millis() - submitted.timestamp_millis();
        count += 1;
    }
    if count == 0 {
        return 0;
    }
    let mean_hours = total_ms as f64 / count as f64 / (1000.0 * 60.0 * 60.0);
    mean_hours.round() as i64
}

/// 最近动态：按提交时间取最近 n 份报告（新的在前）。
pub fn recent_activity(reports: &[SeizureReportRecord], n: usize) -> Vec<SeizureReportRecord> {
    let mut sorted: Vec<SeizureReportRecord> = reports.to_vec();
    sorted.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    sorted.truncate(n);
    sorted
}
