//! 扣押报告集合
//!
//! 对 `seizureReports` 键的类型化封装：
//! - 提交校验：车牌号、车辆类型、地点、事由必填，照片必传
//! - id 形如 `SR<epoch 毫秒>`，全局唯一且随创建顺序单调递增
//! - 状态更新与指派会盖 `updatedAt` 时间戳
//!
//! 状态回退（resolved → pending）不在存储层限制，见 DESIGN.md。

use crate::clock::{now_epoch_ms, now_iso};
use crate::error::StorageError;
use crate::keys::KEY_SEIZURE_REPORTS;
use crate::models::{ReportPatch, ReportStatus, SeizureReportRecord};
use crate::traits::{KeyValueStore, read_json, write_json};
use crate::validation::{ensure_required, normalize_vehicle_number};
use std::sync::Arc;

/// 报告 id 前缀。
pub const REPORT_ID_PREFIX: &str = "SR";

/// 扣押报告集合。
#[derive(Clone)]
pub struct ReportCollection {
    kv: Arc<dyn KeyValueStore>,
}

impl ReportCollection {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// 读取整个集合（插入顺序，键缺失视为空集合）。
    pub async fn all(&self) -> Result<Vec<SeizureReportRecord>, StorageError> {
        Ok(read_json(self.kv.as_ref(), KEY_SEIZURE_REPORTS)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, reports: &[SeizureReportRecord]) -> Result<(), StorageError> {
        write_json(self.kv.as_ref(), KEY_SEIZURE_REPORTS, &reports).await
    }

    /// 追加一份报告。
    ///
    /// `id` 为空时分配 `SR<epoch 毫秒>`（同毫秒提交时在上一 id 基础上 +1，
    /// 保证唯一与单调）；`submitted_at` 为空时补当前时刻；车牌号转大写。
    pub async fn add(
        &self,
        mut record: SeizureReportRecord,
    ) -> Result<SeizureReportRecord, StorageError> {
        ensure_required("vehicle number", &record.vehicle_info.number)?;
        ensure_required("vehicle type", &record.vehicle_info.vehicle_type)?;
        ensure_required("seizure location", &record.seizure_details.location)?;
        ensure_required("seizure reason", &record.seizure_details.reason)?;
        if record.photo.as_deref().is_none_or(str::is_empty) {
            return Err(StorageError::validation("vehicle photo is required"));
        }

        record.vehicle_info.number = normalize_vehicle_number(&record.vehicle_info.number);

        let mut reports = self.all().await?;
        if record.id.is_empty() {
            let last = reports
                .iter()
                .filter_map(|report| parse_report_id(&report.id))
                .max()
                .unwrap_or(0);
            record.id = format!("{REPORT_ID_PREFIX}{}", now_epoch_ms().max(last + 1));
        } else if reports.iter().any(|report| report.id == record.id) {
            return Err(StorageError::validation(format!(
                "report id {} already exists",
                record.id
            )));
        }
        if record.submitted_at.is_empty() {
            record.submitted_at = now_iso();
        }

        reports.push(record.clone());
        self.save(&reports).await?;
        Ok(record)
    }

    /// 合并更新指定报告并盖 `updatedAt`。
    pub async fn update(
        &self,
        id: &str,
        patch: ReportPatch,
    ) -> Result<SeizureReportRecord, StorageError> {
        let mut reports = self.all().await?;
        let report = reports
            .iter_mut()
            .find(|report| report.id == id)
            .ok_or_else(|| StorageError::not_found(format!("report {id}")))?;

        if let Some(status) = patch.status {
            report.status = status;
        }
        if let Some(priority) = patch.priority {
            report.priority = priority;
        }
        if let Some(assigned_to) = patch.assigned_to {
            report.assigned_to = Some(assigned_to);
        }
        if let Some(due_date) = patch.due_date {
            report.due_date = Some(due_date);
        }
        if let Some(notes) = patch.notes {
            report.seizure_details.notes = Some(notes);
        }
        report.updated_at = Some(now_iso());

        let updated = report.clone();
        self.save(&reports).await?;
        Ok(updated)
    }

    /// 更新报告状态（任意方向，存储层不限制回退）。
    pub async fn update_status(
        &self,
        id: &str,
        status: ReportStatus,
    ) -> Result<SeizureReportRecord, StorageError> {
        self.update(
            id,
            ReportPatch {
                status: Some(status),
                ..ReportPatch::default()
            },
        )
        .await
    }

    /// 指派报告给某个用户，可选截止日期。
    pub async fn assign(
        &self,
        id: &str,
        user_id: i64,
        due_date: Option<String>,
    ) -> Result<SeizureReportRecord, StorageError> {
        self.update(
            id,
            ReportPatch {
                assigned_to: Some(user_id),
                due_date,
                ..ReportPatch::default()
            },
        )
        .await
    }

    pub async fn find(&self, id: &str) -> Result<Option<SeizureReportRecord>, StorageError> {
        Ok(self.all().await?.into_iter().find(|report| report.id == id))
    }

    /// 按谓词查找第一份匹配的报告。
    pub async fn find_where(
        &self,
        predicate: impl Fn(&SeizureReportRecord) -> bool,
    ) -> Result<Option<SeizureReportRecord>, StorageError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .find(|report| predicate(report)))
    }

    /// 按谓词过滤（保持插入顺序）。
    pub async fn filter_where(
        &self,
        predicate: impl Fn(&SeizureReportRecord) -> bool,
    ) -> Result<Vec<SeizureReportRecord>, StorageError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|report| predicate(report))
            .collect())
    }
}

/// 解析 `SR<毫秒>` 形式的 id，非法格式返回 None。
fn parse_report_id(id: &str) -> Option<i64> {
    id.strip_prefix(REPORT_ID_PREFIX)?.parse().ok()
}
