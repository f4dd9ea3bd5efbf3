//! 报告服务
//!
//! 提交走当前会话（任何已登录用户）；状态更新与指派是管理员操作。

use crate::audit::AuditRecorder;
use crate::{ServiceError, require_admin, require_session};
use api_contract::ReportSubmission;
use csms_auth::SessionGate;
use csms_query::{ReportFilter, filter_reports, report_stats};
use csms_storage::{
    DocumentAttachment, GeoCoordinates, KeyValueStore, ReportCollection, ReportPriority,
    ReportStatus, SeizureDetails, SeizureReportRecord, VehicleInfo,
};
use std::sync::Arc;

/// 报告服务。
#[derive(Clone)]
pub struct ReportService {
    reports: ReportCollection,
    gate: SessionGate,
    recorder: AuditRecorder,
}

impl ReportService {
    pub fn new(kv: Arc<dyn KeyValueStore>, gate: SessionGate, recorder: AuditRecorder) -> Self {
        Self {
            reports: ReportCollection::new(kv),
            gate,
            recorder,
        }
    }

    /// 提交一份扣押报告（要求已登录，提交人取自会话）。
    pub async fn submit(
        &self,
        submission: ReportSubmission,
    ) -> Result<SeizureReportRecord, ServiceError> {
        let ctx = require_session(&self.gate).await?;

        let notes = submission
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);
        let record = SeizureReportRecord {
            id: String::new(),
            submitted_by: ctx.display_name.clone(),
            submitted_by_id: ctx.user_id,
            submitted_at: String::new(),
            status: ReportStatus::Pending,
            priority: ReportPriority::default(),
            assigned_to: None,
            due_date: None,
            coordinates: submission.coordinates.map(|dto| GeoCoordinates {
                lat: dto.lat,
                lng: dto.lng,
                accuracy: dto.accuracy,
            }),
            vehicle_info: VehicleInfo {
                number: submission.vehicle_number,
                vehicle_type: submission.vehicle_type,
                make: submission.vehicle_make,
                color: submission.vehicle_color,
            },
            seizure_details: SeizureDetails {
                location: submission.location,
                reason: submission.reason,
                notes,
            },
            photo: submission.photo,
            documents: submission
                .documents
                .into_iter()
                .map(|(key, dto)| {
                    (
                        key,
                        DocumentAttachment {
                            name: dto.name,
                            data: dto.data,
                            mime_type: dto.mime_type,
                        },
                    )
                })
                .collect(),
            updated_at: None,
        };

        let added = self.reports.add(record).await?;
        csms_telemetry::record_report_submitted();
        self.recorder
            .record(
                "report_submitted",
                format!("Report {}", added.id),
                format!(
                    "Car seizure report submitted for vehicle {}",
                    added.vehicle_info.number
                ),
            )
            .await;
        Ok(added)
    }

    /// 更新报告状态（管理员）。
    pub async fn update_status(
        &self,
        id: &str,
        status: ReportStatus,
    ) -> Result<SeizureReportRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let updated = self.reports.update_status(id, status).await?;
        self.recorder
            .record(
                "report_status_updated",
                format!("Report {id}"),
                format!("Report {id} marked as {}", status_name(status)),
            )
            .await;
        Ok(updated)
    }

    /// 指派报告（管理员）。
    pub async fn assign(
        &self,
        id: &str,
        user_id: i64,
        due_date: Option<String>,
    ) -> Result<SeizureReportRecord, ServiceError> {
        require_admin(&self.gate).await?;
        let updated = self.reports.assign(id, user_id, due_date).await?;
        self.recorder
            .record(
                "report_assigned",
                format!("Report {id}"),
                format!("Report {id} assigned to user {user_id}"),
            )
            .await;
        Ok(updated)
    }

    /// 按条件过滤（submittedAt 降序）。
    pub async fn list(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<SeizureReportRecord>, ServiceError> {
        Ok(filter_reports(&self.reports.all().await?, filter))
    }

    pub async fn find(&self, id: &str) -> Result<Option<SeizureReportRecord>, ServiceError> {
        Ok(self.reports.find(id).await?)
    }

    /// 工作台概览统计。
    pub async fn stats(&self) -> Result<csms_query::ReportStats, ServiceError> {
        Ok(report_stats(&self.reports.all().await?))
    }
}

fn status_name(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "pending",
        ReportStatus::Reviewed => "reviewed",
        ReportStatus::Resolved => "resolved",
    }
}
