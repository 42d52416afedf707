/// Diesel-based implementation of AuditRecorder
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::modules::audit::domain::entities::{AuditEntry, NewAuditEntry};
use crate::modules::audit::domain::repository::AuditRecorder;
use crate::modules::audit::infrastructure::models::{AuditLogModel, NewAuditLogRow};
use crate::schema::audit_log;
use crate::shared::errors::AppResult;
use crate::shared::Database;

pub struct AuditRecorderImpl {
    db: Arc<Database>,
}

impl AuditRecorderImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditRecorder for AuditRecorderImpl {
    async fn record(&self, entry: NewAuditEntry) -> AppResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<()> {
            let mut conn = db.get_connection()?;

            let row = NewAuditLogRow {
                id: Uuid::new_v4(),
                actor_id: entry.actor_id,
                action: entry.action.as_str().to_string(),
                work_item_id: entry.work_item_id,
                before: entry.before,
                after: entry.after,
            };

            diesel::insert_into(audit_log::table)
                .values(&row)
                .execute(&mut conn)?;

            Ok(())
        })
        .await?
    }

    async fn entries_for_item(&self, work_item_id: Uuid) -> AppResult<Vec<AuditEntry>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Vec<AuditEntry>> {
            let mut conn = db.get_connection()?;

            let rows: Vec<AuditLogModel> = audit_log::table
                .filter(audit_log::work_item_id.eq(work_item_id))
                .order(audit_log::created_at.asc())
                .load(&mut conn)?;

            Ok(rows.into_iter().map(|r| r.to_entry()).collect())
        })
        .await?
    }
}
