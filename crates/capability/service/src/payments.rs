//! 缴费服务
//!
//! 缴费台账是管理员工作台的功能：录入人取自会话展示名，
//! 历史按车牌号精确检索（大小写不敏感）。

use crate::audit::AuditRecorder;
use crate::{ServiceError, require_admin};
use api_contract::PaymentSubmission;
use csms_auth::SessionGate;
use csms_storage::{KeyValueStore, PaymentCollection, PaymentMap, PaymentRecord};
use std::sync::Arc;

/// 缴费服务。
#[derive(Clone)]
pub struct PaymentService {
    payments: PaymentCollection,
    gate: SessionGate,
    recorder: AuditRecorder,
}

impl PaymentService {
    pub fn new(kv: Arc<dyn KeyValueStore>, gate: SessionGate, recorder: AuditRecorder) -> Self {
        Self {
            payments: PaymentCollection::new(kv),
            gate,
            recorder,
        }
    }

    /// 录入一笔缴费（管理员）。
    pub async fn record(
        &self,
        submission: PaymentSubmission,
    ) -> Result<PaymentRecord, ServiceError> {
        let ctx = require_admin(&self.gate).await?;

        let record = PaymentRecord {
            id: String::new(),
            vehicle_number: submission.vehicle_number,
            mobile_number: submission.mobile_number,
            owner_name: submission
                .owner_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            amount: submission.amount,
            payment_type: submission.payment_type,
            payment_method: submission.payment_method,
            screenshot: submission.screenshot,
            date: String::new(),
            recorded_by: ctx.display_name.clone(),
            recorded_at: String::new(),
        };

        let added = self.payments.add(record).await?;
        csms_telemetry::record_payment_recorded();
        self.recorder
            .record(
                "payment_recorded",
                format!("Vehicle {}", added.vehicle_number),
                format!(
                    "Payment of ₹{} recorded for vehicle {}",
                    added.amount, added.vehicle_number
                ),
            )
            .await;
        Ok(added)
    }

    /// 指定车辆的缴费历史（录入顺序）。
    pub async fn history(&self, vehicle: &str) -> Result<Vec<PaymentRecord>, ServiceError> {
        Ok(self.payments.payments_for(vehicle).await?)
    }

    /// 指定车辆的累计缴费金额。
    pub async fn total(&self, vehicle: &str) -> Result<f64, ServiceError> {
        Ok(self.payments.total_for(vehicle).await?)
    }

    /// 完整映射（导出用）。
    pub async fn all(&self) -> Result<PaymentMap, ServiceError> {
        Ok(self.payments.map().await?)
    }
}
