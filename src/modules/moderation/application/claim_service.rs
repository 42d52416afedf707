/// Claim management service
///
/// Assignment and release of work items. Claims go through an atomic
/// compare-and-swap in the repository so two moderators can never hold the
/// same item; this layer adds role checks, idempotency, and audit records.
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::log_warn;
use crate::modules::audit::{AuditAction, AuditRecorder, NewAuditEntry};
use crate::modules::moderation::domain::visibility;
use crate::modules::moderation::domain::{Caller, WorkItem, WorkItemRepository};
use crate::shared::errors::{AppError, AppResult};

pub struct ClaimService {
    repository: Arc<dyn WorkItemRepository>,
    audit: Arc<dyn AuditRecorder>,
}

impl ClaimService {
    pub fn new(repository: Arc<dyn WorkItemRepository>, audit: Arc<dyn AuditRecorder>) -> Self {
        Self { repository, audit }
    }

    /// Claim a work item for review. Claiming a pending item moves it to
    /// `in_review`; re-claiming an item the caller already holds is a no-op
    /// that keeps the original `assigned_at`. Admins may take over items
    /// held by someone else, and any moderator may take over an assignment
    /// whose visibility window has lapsed without resolution.
    pub async fn assign(&self, caller: &Caller, item_id: Uuid) -> AppResult<WorkItem> {
        require_moderator(caller)?;

        let item = self
            .repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Work item {} not found", item_id)))?;

        if item.status.is_terminal() {
            return Err(AppError::ValidationError(format!(
                "Work item {} is already {}",
                item_id, item.status
            )));
        }

        if item.is_assigned_to(caller.id) {
            return Ok(item);
        }

        let before = assignment_snapshot(&item);
        let stale_cutoff = visibility::visibility_cutoff(Utc::now());
        match self
            .repository
            .try_claim(item_id, caller.id, caller.is_admin, stale_cutoff)
            .await?
        {
            Some(updated) => {
                self.record_audit(
                    NewAuditEntry::new(Some(caller.id), AuditAction::Assigned, item_id)
                        .with_before(before)
                        .with_after(assignment_snapshot(&updated)),
                )
                .await;
                Ok(updated)
            }
            None => {
                // CAS missed: someone else holds the item, or it just went
                // terminal. Re-fetch to report the actual state.
                let current = self
                    .repository
                    .find_by_id(item_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Work item {} not found", item_id)))?;
                match current.assigned_to {
                    Some(holder) if holder != caller.id => {
                        Err(AppError::Conflict {
                            assigned_to: holder,
                        })
                    }
                    _ => Err(AppError::ValidationError(format!(
                        "Work item {} can no longer be claimed (status '{}')",
                        item_id, current.status
                    ))),
                }
            }
        }
    }

    /// Release a claimed item back to `pending`. Only the current assignee
    /// or an admin may release; the repository guard ensures a concurrent
    /// reassignment is never clobbered.
    pub async fn release(&self, caller: &Caller, item_id: Uuid) -> AppResult<WorkItem> {
        require_moderator(caller)?;

        let item = self
            .repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Work item {} not found", item_id)))?;

        let assignee = item.assigned_to.ok_or_else(|| {
            AppError::ValidationError(format!("Work item {} is not assigned", item_id))
        })?;

        if assignee != caller.id && !caller.is_admin {
            return Err(AppError::Forbidden(
                "Only the current assignee or an admin can release this item".to_string(),
            ));
        }

        if item.status.is_terminal() {
            return Err(AppError::ValidationError(format!(
                "Work item {} is already {} and cannot be released",
                item_id, item.status
            )));
        }

        let before = assignment_snapshot(&item);
        match self.repository.release(item_id, Some(assignee)).await? {
            Some(updated) => {
                self.record_audit(
                    NewAuditEntry::new(Some(caller.id), AuditAction::Released, item_id)
                        .with_before(before)
                        .with_after(assignment_snapshot(&updated)),
                )
                .await;
                Ok(updated)
            }
            None => Err(AppError::ValidationError(format!(
                "Assignment of work item {} changed concurrently; refresh and retry",
                item_id
            ))),
        }
    }

    async fn record_audit(&self, entry: NewAuditEntry) {
        if let Err(e) = self.audit.record(entry).await {
            log_warn!("Audit write failed (continuing): {}", e);
        }
    }
}

fn require_moderator(caller: &Caller) -> AppResult<()> {
    if !caller.is_moderator {
        return Err(AppError::Forbidden(
            "Moderator role required".to_string(),
        ));
    }
    Ok(())
}

fn assignment_snapshot(item: &WorkItem) -> serde_json::Value {
    json!({
        "status": item.status,
        "assigned_to": item.assigned_to,
        "assigned_at": item.assigned_at,
    })
}
