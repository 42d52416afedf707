/// Review service
///
/// Drives the kind-parameterized state machine: contributions end in
/// approved/rejected/needs_changes, reports in resolved/dismissed. Approving
/// a contribution also materializes its payload into the catalog, in the
/// same transaction as the status write.
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::log_warn;
use crate::modules::audit::{AuditAction, AuditRecorder, NewAuditEntry};
use crate::modules::moderation::domain::state_machine::{validate_transition, ReviewAction};
use crate::modules::moderation::domain::{
    Caller, TransitionUpdate, WorkItem, WorkItemRepository, WorkItemStatus,
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::validation::Validator;

pub struct ReviewService {
    repository: Arc<dyn WorkItemRepository>,
    audit: Arc<dyn AuditRecorder>,
}

impl ReviewService {
    pub fn new(repository: Arc<dyn WorkItemRepository>, audit: Arc<dyn AuditRecorder>) -> Self {
        Self { repository, audit }
    }

    /// Apply a review action to an item the caller holds. Re-approving an
    /// already-approved contribution is a no-op so retried requests never
    /// double-apply changes.
    pub async fn review(
        &self,
        caller: &Caller,
        item_id: Uuid,
        action: ReviewAction,
        reason: Option<String>,
    ) -> AppResult<WorkItem> {
        if !caller.is_moderator {
            return Err(AppError::Forbidden("Moderator role required".to_string()));
        }

        let item = self
            .repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Work item {} not found", item_id)))?;

        if action == ReviewAction::Approve
            && item.kind.is_contribution()
            && item.status == WorkItemStatus::Approved
        {
            return Ok(item);
        }

        match item.assigned_to {
            Some(assignee) if assignee == caller.id || caller.is_admin => {}
            Some(_) => {
                return Err(AppError::Forbidden(
                    "Only the current assignee or an admin can review this item".to_string(),
                ))
            }
            None => {
                return Err(AppError::ValidationError(format!(
                    "Work item {} must be claimed before review",
                    item_id
                )))
            }
        }

        let target = validate_transition(item.kind, item.status, action)?;

        if action.requires_reason() {
            Validator::validate_resolution_reason(reason.as_deref().unwrap_or(""))?;
        }

        let before = review_snapshot(&item);
        let updated = if action == ReviewAction::Approve && item.kind.is_contribution() {
            self.repository
                .approve_and_apply(item_id, caller.id, reason.clone(), caller.is_admin)
                .await?
        } else {
            self.repository
                .transition(
                    item_id,
                    TransitionUpdate {
                        status: target,
                        reviewed_by: caller.id,
                        resolution_notes: reason.clone(),
                        admin_override: caller.is_admin,
                    },
                )
                .await?
        };

        let updated = updated.ok_or_else(|| {
            AppError::ValidationError(format!(
                "Work item {} changed concurrently; refresh and retry",
                item_id
            ))
        })?;

        let audit_action = match action {
            ReviewAction::Approve => AuditAction::Approved,
            ReviewAction::Reject => AuditAction::Rejected,
            ReviewAction::NeedsChanges => AuditAction::NeedsChanges,
            ReviewAction::Resolve => AuditAction::Resolved,
            ReviewAction::Dismiss => AuditAction::Dismissed,
        };
        if let Err(e) = self
            .audit
            .record(
                NewAuditEntry::new(Some(caller.id), audit_action, item_id)
                    .with_before(before)
                    .with_after(review_snapshot(&updated)),
            )
            .await
        {
            log_warn!("Audit write failed (continuing): {}", e);
        }

        Ok(updated)
    }
}

fn review_snapshot(item: &WorkItem) -> serde_json::Value {
    json!({
        "status": item.status,
        "subject_id": item.subject_id,
        "reviewed_by": item.reviewed_by,
        "resolution_notes": item.resolution_notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::modules::audit::domain::repository::MockAuditRecorder;
    use crate::modules::moderation::domain::repository::MockWorkItemRepository;
    use crate::modules::moderation::domain::value_objects::{SubjectType, WorkItemKind};

    fn in_review_item(id: Uuid, kind: WorkItemKind, assignee: Uuid) -> WorkItem {
        WorkItem {
            id,
            kind,
            subject_type: if kind.is_contribution() {
                SubjectType::Anime
            } else {
                SubjectType::Review
            },
            subject_id: Some(Uuid::new_v4()),
            submitter_id: Some(Uuid::new_v4()),
            payload: kind
                .is_contribution()
                .then(|| json!({"fields": {"title": "Example"}})),
            description: kind.is_report().then(|| "spam review".to_string()),
            status: WorkItemStatus::InReview,
            assigned_to: Some(assignee),
            assigned_at: Some(Utc::now()),
            reviewed_by: None,
            reviewed_at: None,
            resolution_notes: None,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn quiet_audit() -> MockAuditRecorder {
        let mut audit = MockAuditRecorder::new();
        audit.expect_record().returning(|_| Ok(()));
        audit
    }

    #[tokio::test]
    async fn approve_contribution_goes_through_apply_path() {
        let item_id = Uuid::new_v4();
        let moderator = Caller::moderator(Uuid::new_v4());
        let moderator_id = moderator.id;

        let mut repo = MockWorkItemRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            Ok(Some(in_review_item(
                item_id,
                WorkItemKind::ContentContribution,
                moderator_id,
            )))
        });
        repo.expect_approve_and_apply()
            .with(eq(item_id), eq(moderator_id), eq(None::<String>), eq(false))
            .returning(move |_, reviewer, _, _| {
                let mut item =
                    in_review_item(item_id, WorkItemKind::ContentContribution, reviewer);
                item.status = WorkItemStatus::Approved;
                item.reviewed_by = Some(reviewer);
                item.reviewed_at = Some(Utc::now());
                Ok(Some(item))
            });

        let service = ReviewService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let updated = service
            .review(&moderator, item_id, ReviewAction::Approve, None)
            .await
            .unwrap();
        assert_eq!(updated.status, WorkItemStatus::Approved);
        assert_eq!(updated.reviewed_by, Some(moderator_id));
    }

    #[tokio::test]
    async fn re_approving_approved_contribution_is_a_no_op() {
        let item_id = Uuid::new_v4();
        let moderator = Caller::moderator(Uuid::new_v4());
        let moderator_id = moderator.id;

        let mut repo = MockWorkItemRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            let mut item = in_review_item(item_id, WorkItemKind::ContentContribution, moderator_id);
            item.status = WorkItemStatus::Approved;
            item.reviewed_by = Some(moderator_id);
            Ok(Some(item))
        });
        repo.expect_approve_and_apply()
            .times(0)
            .returning(|_, _, _, _| Ok(None));

        let service = ReviewService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let item = service
            .review(&moderator, item_id, ReviewAction::Approve, None)
            .await
            .unwrap();
        assert_eq!(item.status, WorkItemStatus::Approved);
    }

    #[tokio::test]
    async fn reject_requires_a_substantive_reason() {
        let item_id = Uuid::new_v4();
        let moderator = Caller::moderator(Uuid::new_v4());
        let moderator_id = moderator.id;

        let mut repo = MockWorkItemRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            Ok(Some(in_review_item(
                item_id,
                WorkItemKind::ContentContribution,
                moderator_id,
            )))
        });

        let service = ReviewService::new(Arc::new(repo), Arc::new(quiet_audit()));
        for reason in [None, Some("".to_string()), Some("short".to_string())] {
            let err = service
                .review(&moderator, item_id, ReviewAction::Reject, reason)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
    }

    #[tokio::test]
    async fn dismiss_report_writes_terminal_status_and_notes() {
        let item_id = Uuid::new_v4();
        let moderator = Caller::moderator(Uuid::new_v4());
        let moderator_id = moderator.id;
        let reason = "duplicate of an earlier report".to_string();

        let mut repo = MockWorkItemRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            Ok(Some(in_review_item(
                item_id,
                WorkItemKind::ReviewReport,
                moderator_id,
            )))
        });
        repo.expect_transition()
            .withf(move |_, update| {
                update.status == WorkItemStatus::Dismissed
                    && update.reviewed_by == moderator_id
                    && update.resolution_notes.is_some()
                    && !update.admin_override
            })
            .returning(move |_, update| {
                let mut item = in_review_item(item_id, WorkItemKind::ReviewReport, moderator_id);
                item.status = update.status;
                item.reviewed_by = Some(update.reviewed_by);
                item.resolution_notes = update.resolution_notes;
                Ok(Some(item))
            });

        let service = ReviewService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let updated = service
            .review(&moderator, item_id, ReviewAction::Dismiss, Some(reason))
            .await
            .unwrap();
        assert_eq!(updated.status, WorkItemStatus::Dismissed);
        assert!(updated.resolution_notes.is_some());
    }

    #[tokio::test]
    async fn non_assignee_cannot_review() {
        let item_id = Uuid::new_v4();
        let holder = Uuid::new_v4();

        let mut repo = MockWorkItemRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            Ok(Some(in_review_item(
                item_id,
                WorkItemKind::ContentContribution,
                holder,
            )))
        });

        let service = ReviewService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let err = service
            .review(
                &Caller::moderator(Uuid::new_v4()),
                item_id,
                ReviewAction::Approve,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_can_review_a_foreign_assignment() {
        let item_id = Uuid::new_v4();
        let holder = Uuid::new_v4();
        let admin = Caller::admin(Uuid::new_v4());
        let admin_id = admin.id;

        let mut repo = MockWorkItemRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            Ok(Some(in_review_item(item_id, WorkItemKind::UserReport, holder)))
        });
        repo.expect_transition()
            .withf(|_, update| update.admin_override)
            .returning(move |_, update| {
                let mut item = in_review_item(item_id, WorkItemKind::UserReport, holder);
                item.status = update.status;
                item.reviewed_by = Some(update.reviewed_by);
                Ok(Some(item))
            });

        let service = ReviewService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let updated = service
            .review(&admin, item_id, ReviewAction::Resolve, None)
            .await
            .unwrap();
        assert_eq!(updated.reviewed_by, Some(admin_id));
    }

    #[tokio::test]
    async fn report_vocabulary_rejects_contribution_actions() {
        let item_id = Uuid::new_v4();
        let moderator = Caller::moderator(Uuid::new_v4());
        let moderator_id = moderator.id;

        let mut repo = MockWorkItemRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            Ok(Some(in_review_item(
                item_id,
                WorkItemKind::ContentReport,
                moderator_id,
            )))
        });

        let service = ReviewService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let err = service
            .review(&moderator, item_id, ReviewAction::Approve, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn unclaimed_item_cannot_be_reviewed() {
        let item_id = Uuid::new_v4();
        let moderator = Caller::moderator(Uuid::new_v4());

        let mut repo = MockWorkItemRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            let mut item =
                in_review_item(item_id, WorkItemKind::ContentReport, Uuid::new_v4());
            item.status = WorkItemStatus::Pending;
            item.assigned_to = None;
            item.assigned_at = None;
            Ok(Some(item))
        });

        let service = ReviewService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let err = service
            .review(&moderator, item_id, ReviewAction::Resolve, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn concurrent_transition_surfaces_as_validation_error() {
        let item_id = Uuid::new_v4();
        let moderator = Caller::moderator(Uuid::new_v4());
        let moderator_id = moderator.id;

        let mut repo = MockWorkItemRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            Ok(Some(in_review_item(
                item_id,
                WorkItemKind::ContentReport,
                moderator_id,
            )))
        });
        repo.expect_transition().returning(|_, _| Ok(None));

        let service = ReviewService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let err = service
            .review(&moderator, item_id, ReviewAction::Resolve, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
