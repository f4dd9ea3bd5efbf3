//! 验证辅助函数
//!
//! 提供统一的验证逻辑，确保数据一致性：
//! - ensure_required：必填字符串非空
//! - is_valid_mobile：缴费手机号 ^\d{10}$
//! - normalize_vehicle_number：车牌号去空白并转大写
//!
//! 使用场景：集合写入前的本地同步校验（不依赖外部服务）。

use crate::error::StorageError;
use regex::Regex;
use std::sync::OnceLock;

/// 验证必填字段非空（含仅空白）。
pub fn ensure_required(field: &str, value: &str) -> Result<(), StorageError> {
    if value.trim().is_empty() {
        return Err(StorageError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn mobile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{10}$").expect("mobile regex"))
}

/// 校验 10 位手机号。
pub fn is_valid_mobile(value: &str) -> bool {
    mobile_regex().is_match(value)
}

/// 车牌号规范化：去空白、转大写（检索按精确键匹配）。
pub fn normalize_vehicle_number(value: &str) -> String {
    value.trim().to_uppercase()
}
