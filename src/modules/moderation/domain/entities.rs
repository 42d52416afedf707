/// Domain entities for the moderation work-queue
///
/// A WorkItem is one unit of moderation work: a community report on some
/// piece of content, or a contribution proposing field changes to a catalog
/// entity. All four kinds share a single lifecycle.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::value_objects::{SubjectType, WorkItemKind, WorkItemStatus};
use crate::shared::errors::{AppError, AppResult};

/// Proposed field changes for a contribution, plus an optional snapshot of
/// the prior values for diffing in review UIs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributionPayload {
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Map<String, Value>>,
}

impl ContributionPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            previous: None,
        }
    }

    pub fn with_previous(mut self, previous: Map<String, Value>) -> Self {
        self.previous = Some(previous);
        self
    }
}

/// A report to be submitted (before insertion to database)
#[derive(Debug, Clone)]
pub struct NewReport {
    pub kind: WorkItemKind,
    pub subject_type: SubjectType,
    pub subject_id: Uuid,
    pub submitter_id: Option<Uuid>,
    pub description: String,
}

/// A contribution to be submitted (before insertion to database).
/// `subject_id` is None when proposing a brand-new catalog entity.
#[derive(Debug, Clone)]
pub struct NewContribution {
    pub subject_type: SubjectType,
    pub subject_id: Option<Uuid>,
    pub submitter_id: Option<Uuid>,
    pub payload: ContributionPayload,
}

/// Work item record from the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: Uuid,
    pub kind: WorkItemKind,
    pub subject_type: SubjectType,
    pub subject_id: Option<Uuid>,
    pub submitter_id: Option<Uuid>,
    pub payload: Option<Value>,
    pub description: Option<String>,
    pub status: WorkItemStatus,
    pub assigned_to: Option<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl WorkItem {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }

    pub fn is_assigned_to(&self, moderator_id: Uuid) -> bool {
        self.assigned_to == Some(moderator_id)
    }

    /// Parse the contribution payload. Errors for report kinds or when the
    /// stored JSON does not match the payload shape.
    pub fn parse_payload(&self) -> AppResult<ContributionPayload> {
        let raw = self.payload.as_ref().ok_or_else(|| {
            AppError::ValidationError(format!("Work item {} has no contribution payload", self.id))
        })?;
        Ok(serde_json::from_value(raw.clone())?)
    }
}
