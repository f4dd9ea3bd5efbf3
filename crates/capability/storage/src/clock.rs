//! 时间辅助函数
//!
//! 记录 id 由 epoch 毫秒派生，时间戳字段统一使用 ISO-8601（UTC）。

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// 当前 epoch 毫秒。
pub fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as i64
}

/// 当前时刻的 ISO-8601 字符串（毫秒精度，`Z` 结尾）。
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 把 epoch 毫秒转成 ISO-8601 字符串。
pub fn iso_from_epoch_ms(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms) {
        chrono::LocalResult::Single(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        _ => "1970-01-01T00:00:00.000Z".to_string(),
    }
}

/// 解析 ISO-8601 时间戳（宽松：解析失败返回 None）。
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
