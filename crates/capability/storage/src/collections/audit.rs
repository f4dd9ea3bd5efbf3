//! 审计日志集合
//!
//! 对 `auditLog` 键的类型化封装：
//! - 只追加；每次追加后 FIFO 截断，只保留最近 `cap` 条（默认 1000）
//! - id/时间戳未显式给出时由集合补齐
//!
//! 审计写入是尽力而为：调用方在无法解析当前用户时直接跳过，
//! 追加失败不应中断触发它的业务操作。

use crate::clock::{now_epoch_ms, now_iso};
use crate::error::StorageError;
use crate::keys::KEY_AUDIT_LOG;
use crate::models::AuditLogEntry;
use crate::traits::{KeyValueStore, read_json, write_json};
use std::sync::Arc;

/// 默认保留的审计条数上限。
pub const DEFAULT_AUDIT_LOG_CAP: usize = 1000;

/// 追加结果：落账的记录与本次被淘汰的旧记录条数。
#[derive(Debug, Clone)]
pub struct AuditAppend {
    pub entry: AuditLogEntry,
    pub evicted: usize,
}

/// 审计日志集合。
#[derive(Clone)]
pub struct AuditLogCollection {
    kv: Arc<dyn KeyValueStore>,
    cap: usize,
}

impl AuditLogCollection {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_cap(kv, DEFAULT_AUDIT_LOG_CAP)
    }

    pub fn with_cap(kv: Arc<dyn KeyValueStore>, cap: usize) -> Self {
        Self { kv, cap }
    }

    /// 读取全部审计记录（追加顺序，键缺失视为空集合）。
    pub async fn all(&self) -> Result<Vec<AuditLogEntry>, StorageError> {
        Ok(read_json(self.kv.as_ref(), KEY_AUDIT_LOG)
            .await?
            .unwrap_or_default())
    }

    /// 追加一条审计记录并按上限截断（最旧的先淘汰）。
    pub async fn append(&self, mut entry: AuditLogEntry) -> Result<AuditAppend, StorageError> {
        let mut entries = self.all().await?;

        if entry.id == 0 {
            let last = entries.iter().map(|item| item.id).max().unwrap_or(0);
            entry.id = now_epoch_ms().max(last + 1);
        }
        if entry.timestamp.is_empty() {
            entry.timestamp = now_iso();
        }

        entries.push(entry.clone());
        let mut evicted = 0;
        if entries.len() > self.cap {
            evicted = entries.len() - self.cap;
            entries.drain(..evicted);
            tracing::debug!(evicted, cap = self.cap, "audit log truncated");
        }
        write_json(self.kv.as_ref(), KEY_AUDIT_LOG, &entries).await?;
        Ok(AuditAppend { entry, evicted })
    }

    /// 最近 n 条（新的在前）。
    pub async fn recent(&self, n: usize) -> Result<Vec<AuditLogEntry>, StorageError> {
        let entries = self.all().await?;
        Ok(entries.into_iter().rev().take(n).collect())
    }
}
