use crate::schema::audit_log;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::modules::audit::domain::entities::AuditEntry;

// For reading from database
#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = audit_log)]
pub struct AuditLogModel {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub work_item_id: Uuid,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogModel {
    pub fn to_entry(self) -> AuditEntry {
        AuditEntry {
            id: self.id,
            actor_id: self.actor_id,
            action: self.action,
            work_item_id: self.work_item_id,
            before: self.before,
            after: self.after,
            created_at: self.created_at,
        }
    }
}

// For appending new records
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = audit_log)]
pub struct NewAuditLogRow {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub work_item_id: Uuid,
    pub before: Option<Value>,
    pub after: Option<Value>,
}
