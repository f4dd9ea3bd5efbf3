//! 追踪初始化与进程内计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub login_success: u64,
    pub login_failure: u64,
    pub otp_issued: u64,
    pub otp_verified: u64,
    pub otp_locked: u64,
    pub reports_submitted: u64,
    pub payments_recorded: u64,
    pub audit_entries: u64,
    pub audit_evictions: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    login_success: AtomicU64,
    login_failure: AtomicU64,
    otp_issued: AtomicU64,
    otp_verified: AtomicU64,
    otp_locked: AtomicU64,
    reports_submitted: AtomicU64,
    payments_recorded: AtomicU64,
    audit_entries: AtomicU64,
    audit_evictions: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            login_success: AtomicU64::new(0),
            login_failure: AtomicU64::new(0),
            otp_issued: AtomicU64::new(0),
            otp_verified: AtomicU64::new(0),
            otp_locked: AtomicU64::new(0),
            reports_submitted: AtomicU64::new(0),
            payments_recorded: AtomicU64::new(0),
            audit_entries: AtomicU64::new(0),
            audit_evictions: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            login_success: self.login_success.load(Ordering::Relaxed),
            login_failure: self.login_failure.load(Ordering::Relaxed),
            otp_issued: self.otp_issued.load(Ordering::Relaxed),
            otp_verified: self.otp_verified.load(Ordering::Relaxed),
            otp_locked: self.otp_locked.load(Ordering::Relaxed),
            reports_submitted: self.reports_submitted.load(Ordering::Relaxed),
            payments_recorded: self.payments_recorded.load(Ordering::Relaxed),
            audit_entries: self.audit_entries.load(Ordering::Relaxed),
            audit_evictions: self.audit_evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 记录登录成功次数。
pub fn record_login_success() {
    metrics().login_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录登录失败次数。
pub fn record_login_failure() {
    metrics().login_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录 OTP 下发次数（含重发）。
pub fn record_otp_issued() {
    metrics().otp_issued.fetch_add(1, Ordering::Relaxed);
}

/// 记录 OTP 校验成功次数。
pub fn record_otp_verified() {
    metrics().otp_verified.fetch_add(1, Ordering::Relaxed);
}

/// 记录 OTP 锁定次数（3 次输错）。
pub fn record_otp_locked() {
    metrics().otp_locked.fetch_add(1, Ordering::Relaxed);
}

/// 记录报告提交次数。
pub fn record_report_submitted() {
    metrics().reports_submitted.fetch_add(1, Ordering::Relaxed);
}

/// 记录缴费录入次数。
pub fn record_payment_recorded() {
    metrics().payments_recorded.fetch_add(1, Ordering::Relaxed);
}

/// 记录审计落账次数。
pub fn record_audit_entry() {
    metrics().audit_entries.fetch_add(1, Ordering::Relaxed);
}

/// 记录审计 FIFO 淘汰条数。
pub fn record_audit_evictions(count: u64) {
    if count > 0 {
        metrics().audit_evictions.fetch_add(count, Ordering::Relaxed);
    }
}
