//! 车辆缴费集合
//!
//! 对 `vehiclePayments` 键的类型化封装。存储形态是
//! `车牌号 → 缴费记录列表` 的映射，车牌号统一大写，
//! 每辆车的列表按录入顺序只追加。
//!
//! 校验：手机号必须是 10 位数字、金额必须为正、凭证截图必填。

use crate::clock::{now_epoch_ms, now_iso};
use crate::error::StorageError;
use crate::keys::KEY_VEHICLE_PAYMENTS;
use crate::models::{PaymentMap, PaymentPatch, PaymentRecord};
use crate::traits::{KeyValueStore, read_json, write_json};
use crate::validation::{ensure_required, is_valid_mobile, normalize_vehicle_number};
use std::sync::Arc;

/// 缴费 id 前缀。
pub const PAYMENT_ID_PREFIX: &str = "PAY";

/// 车辆缴费集合。
#[derive(Clone)]
pub struct PaymentCollection {
    kv: Arc<dyn KeyValueStore>,
}

impl PaymentCollection {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// 读取整个映射（键缺失视为空映射）。
    pub async fn map(&self) -> Result<PaymentMap, StorageError> {
        Ok(read_json(self.kv.as_ref(), KEY_VEHICLE_PAYMENTS)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, map: &PaymentMap) -> Result<(), StorageError> {
        write_json(self.kv.as_ref(), KEY_VEHICLE_PAYMENTS, map).await
    }

    /// 按车牌号展平为单个列表（车牌号字典序，单车内录入顺序）。
    pub async fn all_flat(&self) -> Result<Vec<PaymentRecord>, StorageError> {
        Ok(self.map().await?.into_values().flatten().collect())
    }

    /// 追加一条缴费记录。
    ///
    /// `id` 为空时分配 `PAY<epoch 毫秒>`（跨车辆全局单调）；
    /// `date`/`recorded_at` 为空时补当前时刻。校验失败时映射保持不变。
    pub async fn add(&self, mut record: PaymentRecord) -> Result<PaymentRecord, StorageError> {
        ensure_required("vehicle number", &record.vehicle_number)?;
        if !is_valid_mobile(&record.mobile_number) {
            return Err(StorageError::validation(
                "mobile number must be exactly 10 digits",
            ));
        }
        if !(record.amount > 0.0) {
            return Err(StorageError::validation("amount must be positive"));
        }
        if record.screenshot.is_empty() {
            return Err(StorageError::validation("payment screenshot is required"));
        }

        record.vehicle_number = normalize_vehicle_number(&record.vehicle_number);

        let mut map = self.map().await?;
        if record.id.is_empty() {
            let last = map
                .values()
                .flatten()
                .filter_map(|payment| parse_payment_id(&payment.id))
                .max()
                .unwrap_or(0);
            record.id = format!("{PAYMENT_ID_PREFIX}{}", now_epoch_ms().max(last + 1));
        }
        let now = now_iso();
        if record.date.is_empty() {
            record.date = now.clone();
        }
        if record.recorded_at.is_empty() {
            record.recorded_at = now;
        }

        map.entry(record.vehicle_number.clone())
            .or_default()
            .push(record.clone());
        self.save(&map).await?;
        Ok(record)
    }

    /// 指定车辆的缴费历史（录入顺序；车牌号大小写不敏感）。
    pub async fn payments_for(&self, vehicle: &str) -> Result<Vec<PaymentRecord>, StorageError> {
        let key = normalize_vehicle_number(vehicle);
        Ok(self.map().await?.remove(&key).unwrap_or_default())
    }

    /// 指定车辆的累计缴费金额。
    pub async fn total_for(&self, vehicle: &str) -> Result<f64, StorageError> {
        Ok(self
            .payments_for(vehicle)
            .await?
            .iter()
            .map(|payment| payment.amount)
            .sum())
    }

    /// 按谓词过滤展平视图（车牌号字典序，单车内录入顺序）。
    pub async fn filter_where(
        &self,
        predicate: impl Fn(&PaymentRecord) -> bool,
    ) -> Result<Vec<PaymentRecord>, StorageError> {
        Ok(self
            .all_flat()
            .await?
            .into_iter()
            .filter(|payment| predicate(payment))
            .collect())
    }

    /// 按 `车牌号 + id` 合并更新一条缴费记录（引导流程不使用）。
    pub async fn update(
        &self,
        vehicle: &str,
        id: &str,
        patch: PaymentPatch,
    ) -> Result<PaymentRecord, StorageError> {
        let key = normalize_vehicle_number(vehicle);
        let mut map = self.map().await?;
        let payment = map
            .get_mut(&key)
            .and_then(|payments| payments.iter_mut().find(|payment| payment.id == id))
            .ok_or_else(|| StorageError::not_found(format!("payment {id} for vehicle {key}")))?;

        if let Some(owner_name) = patch.owner_name {
            payment.owner_name = Some(owner_name);
        }
        if let Some(amount) = patch.amount {
            if !(amount > 0.0) {
                return Err(StorageError::validation("amount must be positive"));
            }
            payment.amount = amount;
        }
        if let Some(payment_type) = patch.payment_type {
            payment.payment_type = payment_type;
        }
        if let Some(payment_method) = patch.payment_method {
            payment.payment_method = payment_method;
        }

        let updated = payment.clone();
        self.save(&map).await?;
        Ok(updated)
    }
}

/// 解析 `PAY<毫秒>` 形式的 id，非法格式返回 None。
fn parse_payment_id(id: &str) -> Option<i64> {
    id.strip_prefix(PAYMENT_ID_PREFIX)?.parse().ok()
}
