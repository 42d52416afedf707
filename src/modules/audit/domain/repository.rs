/// Repository trait for the append-only audit log
use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{AuditEntry, NewAuditEntry};
use crate::shared::errors::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRecorder: Send + Sync {
    /// Append one record. Write-only; there is no update or delete.
    async fn record(&self, entry: NewAuditEntry) -> AppResult<()>;

    /// Full trail for one work item, oldest first
    async fn entries_for_item(&self, work_item_id: Uuid) -> AppResult<Vec<AuditEntry>>;
}
