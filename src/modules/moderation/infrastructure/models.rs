/// Diesel models for the work_items table
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::modules::moderation::domain::entities::WorkItem;
use crate::modules::moderation::domain::value_objects::{
    SubjectType, WorkItemKind, WorkItemStatus,
};
use crate::schema::work_items;

/// Diesel model for inserting new work items
#[derive(Insertable, Debug)]
#[diesel(table_name = work_items)]
pub struct NewWorkItemRow {
    pub id: Uuid,
    pub kind: WorkItemKind,
    pub subject_type: SubjectType,
    pub subject_id: Option<Uuid>,
    pub submitter_id: Option<Uuid>,
    pub payload: Option<JsonValue>,
    pub description: Option<String>,
    pub status: WorkItemStatus,
}

/// Diesel model for querying existing work items
#[derive(Queryable, Selectable, QueryableByName, Debug, Clone)]
#[diesel(table_name = work_items)]
pub struct WorkItemModel {
    pub id: Uuid,
    pub kind: WorkItemKind,
    pub subject_type: SubjectType,
    pub subject_id: Option<Uuid>,
    pub submitter_id: Option<Uuid>,
    pub payload: Option<JsonValue>,
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

impl WorkItemModel {
    /// Convert to domain WorkItem
    pub fn to_work_item(self) -> WorkItem {
        WorkItem {
            id: self.id,
            kind: self.kind,
            subject_type: self.subject_type,
            subject_id: self.subject_id,
            submitter_id: self.submitter_id,
            payload: self.payload,
            description: self.description,
            status: self.status,
            assigned_to: self.assigned_to,
            assigned_at: self.assigned_at,
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at,
            resolution_notes: self.resolution_notes,
            created_at: self.created_at,
            deleted_at: self.deleted_at,
        }
    }
}
