//! 审计记录器
//!
//! 从会话解析操作者并追加审计记录。尽力而为：
//! 匿名（解析不到当前用户）时静默跳过，追加失败只记日志，
//! 绝不让审计问题中断触发它的业务操作。

use csms_auth::SessionGate;
use csms_storage::{AuditLogCollection, AuditLogEntry, KeyValueStore};
use std::sync::Arc;

/// 审计记录器。
#[derive(Clone)]
pub struct AuditRecorder {
    gate: SessionGate,
    audit: AuditLogCollection,
}

impl AuditRecorder {
    pub fn new(gate: SessionGate, kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            gate,
            audit: AuditLogCollection::new(kv),
        }
    }

    /// 以当前会话用户身份落一条审计记录。
    pub async fn record(&self, action: &str, resource: impl Into<String>, details: impl Into<String>) {
        let ctx = match self.gate.session_context().await {
            Ok(Some(ctx)) => ctx,
            Ok(None) => {
                tracing::debug!(action, "audit skipped: no current user");
                return;
            }
            Err(err) => {
                tracing::warn!(action, error = %err, "audit skipped: session unreadable");
                return;
            }
        };

        let entry = AuditLogEntry::new(ctx.user_id, action)
            .with_resource(resource)
            .with_details(details);
        match self.audit.append(entry).await {
            Ok(appended) => {
                csms_telemetry::record_audit_entry();
                csms_telemetry::record_audit_evictions(appended.evicted as u64);
            }
            Err(err) => {
                tracing::warn!(action, error = %err, "audit append failed");
            }
        }
    }
}
