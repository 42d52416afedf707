/// Audit trail entities
///
/// Every mutating operation on a work item appends one immutable record:
/// who did what to which item, with before/after snapshots of the mutated
/// fields. Records are never updated or deleted.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Submitted,
    Assigned,
    Released,
    Approved,
    Rejected,
    NeedsChanges,
    Resolved,
    Dismissed,
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Submitted => "submitted",
            AuditAction::Assigned => "assigned",
            AuditAction::Released => "released",
            AuditAction::Approved => "approved",
            AuditAction::Rejected => "rejected",
            AuditAction::NeedsChanges => "needs_changes",
            AuditAction::Resolved => "resolved",
            AuditAction::Dismissed => "dismissed",
            AuditAction::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record to be appended (before insertion to database)
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub actor_id: Option<Uuid>,
    pub action: AuditAction,
    pub work_item_id: Uuid,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

impl NewAuditEntry {
    pub fn new(actor_id: Option<Uuid>, action: AuditAction, work_item_id: Uuid) -> Self {
        Self {
            actor_id,
            action,
            work_item_id,
            before: None,
            after: None,
        }
    }

    pub fn with_before(mut self, before: Value) -> Self {
        self.before = Some(before);
        self
    }

    pub fn with_after(mut self, after: Value) -> Self {
        self.after = Some(after);
        self
    }
}

/// Audit record from the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub work_item_id: Uuid,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_attaches_snapshots() {
        let item_id = Uuid::new_v4();
        let actor = Uuid::new_v4();

        let entry = NewAuditEntry::new(Some(actor), AuditAction::Assigned, item_id)
            .with_before(json!({"assigned_to": null}))
            .with_after(json!({"assigned_to": actor}));

        assert_eq!(entry.action.as_str(), "assigned");
        assert_eq!(entry.work_item_id, item_id);
        assert!(entry.before.is_some());
        assert!(entry.after.is_some());
    }

    #[test]
    fn action_names_are_stable() {
        assert_eq!(AuditAction::NeedsChanges.to_string(), "needs_changes");
        assert_eq!(AuditAction::Released.to_string(), "released");
    }
}
