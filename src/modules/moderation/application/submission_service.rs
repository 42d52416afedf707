/// Submission service
///
/// Intake for new work items and soft-deletion of existing ones. Reports may
/// be submitted anonymously; contributions always carry a submitter so the
/// needs_changes loop has someone to return the item to.
use std::sync::Arc;

use uuid::Uuid;

use crate::log_warn;
use crate::modules::audit::{AuditAction, AuditRecorder, NewAuditEntry};
use crate::modules::moderation::domain::{
    Caller, ContributionPayload, NewContribution, NewReport, SubjectType, WorkItem, WorkItemKind,
    WorkItemRepository,
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::validation::Validator;

pub struct SubmissionService {
    repository: Arc<dyn WorkItemRepository>,
    audit: Arc<dyn AuditRecorder>,
}

impl SubmissionService {
    pub fn new(repository: Arc<dyn WorkItemRepository>, audit: Arc<dyn AuditRecorder>) -> Self {
        Self { repository, audit }
    }

    /// Submit a report against existing content, a review, or a user.
    /// `submitter` is None for anonymous reports.
    pub async fn submit_report(
        &self,
        submitter: Option<&Caller>,
        kind: WorkItemKind,
        subject_type: SubjectType,
        subject_id: Uuid,
        description: String,
    ) -> AppResult<WorkItem> {
        if kind.is_contribution() {
            return Err(AppError::ValidationError(
                "Contributions must be submitted through submit_contribution".to_string(),
            ));
        }
        validate_report_subject(kind, subject_type)?;
        Validator::validate_report_description(&description)?;

        let submitter_id = submitter.map(|c| c.id);
        let item = self
            .repository
            .insert_report(NewReport {
                kind,
                subject_type,
                subject_id,
                submitter_id,
                description,
            })
            .await?;

        self.record_submitted(submitter_id, &item).await;
        Ok(item)
    }

    /// Submit a contribution proposing field changes to a catalog entity.
    /// `subject_id` is None when proposing a brand-new entity; the id is
    /// back-filled on approval.
    pub async fn submit_contribution(
        &self,
        submitter: &Caller,
        subject_type: SubjectType,
        subject_id: Option<Uuid>,
        payload: ContributionPayload,
    ) -> AppResult<WorkItem> {
        if !subject_type.is_catalog_entity() {
            return Err(AppError::ValidationError(format!(
                "Contributions cannot target subject type '{}'",
                subject_type
            )));
        }
        if payload.fields.is_empty() {
            return Err(AppError::ValidationError(
                "A contribution must propose at least one field change".to_string(),
            ));
        }
        for name in payload.fields.keys() {
            Validator::validate_payload_field_name(name)?;
        }

        let item = self
            .repository
            .insert_contribution(NewContribution {
                subject_type,
                subject_id,
                submitter_id: Some(submitter.id),
                payload,
            })
            .await?;

        self.record_submitted(Some(submitter.id), &item).await;
        Ok(item)
    }

    /// Soft-delete a work item. Admins can delete anything; submitters can
    /// retract their own items. The row is retained for the audit trail but
    /// disappears from every listing.
    pub async fn soft_delete(&self, caller: &Caller, item_id: Uuid) -> AppResult<WorkItem> {
        let item = self
            .repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Work item {} not found", item_id)))?;

        let is_submitter = item.submitter_id == Some(caller.id);
        if !caller.is_admin && !is_submitter {
            return Err(AppError::Forbidden(
                "Only an admin or the submitter can delete this item".to_string(),
            ));
        }

        let deleted = self
            .repository
            .soft_delete(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Work item {} not found", item_id)))?;

        if let Err(e) = self
            .audit
            .record(NewAuditEntry::new(
                Some(caller.id),
                AuditAction::Deleted,
                item_id,
            ))
            .await
        {
            log_warn!("Audit write failed (continuing): {}", e);
        }
        Ok(deleted)
    }

    async fn record_submitted(&self, submitter_id: Option<Uuid>, item: &WorkItem) {
        let entry = NewAuditEntry::new(submitter_id, AuditAction::Submitted, item.id).with_after(
            serde_json::json!({
                "kind": item.kind,
                "subject_type": item.subject_type,
                "subject_id": item.subject_id,
            }),
        );
        if let Err(e) = self.audit.record(entry).await {
            log_warn!("Audit write failed (continuing): {}", e);
        }
    }
}

/// Report kinds are bound to subject families: review reports target reviews,
/// user reports target users, content reports target catalog entities.
fn validate_report_subject(kind: WorkItemKind, subject_type: SubjectType) -> AppResult<()> {
    let compatible = match kind {
        WorkItemKind::ReviewReport => subject_type == SubjectType::Review,
        WorkItemKind::UserReport => subject_type == SubjectType::User,
        WorkItemKind::ContentReport => subject_type.is_catalog_entity(),
        WorkItemKind::ContentContribution => false,
    };
    if !compatible {
        return Err(AppError::ValidationError(format!(
            "Subject type '{}' is not valid for kind '{}'",
            subject_type, kind
        )));
    }
    Ok(())
}
