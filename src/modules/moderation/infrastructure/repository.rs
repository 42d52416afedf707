/// Diesel-based implementation of WorkItemRepository
///
/// Claim and release are single atomic conditional updates; the approve path
/// wraps the status write and the Change Applier in one transaction so an
/// apply failure rolls the whole transition back.
use diesel::prelude::*;
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::modules::catalog::ChangeApplier;
use crate::modules::moderation::domain::entities::{NewContribution, NewReport, WorkItem};
use crate::modules::moderation::domain::repository::{
    QueueEntry, QueueQuery, TransitionUpdate, WorkItemRepository,
};
use crate::modules::moderation::domain::value_objects::{WorkItemKind, WorkItemStatus};
use crate::modules::moderation::domain::visibility;
use crate::modules::moderation::infrastructure::models::{NewWorkItemRow, WorkItemModel};
use crate::schema::{users, work_items};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::Database;
use async_trait::async_trait;

const RETURNING_COLUMNS: &str = "id, kind, subject_type, subject_id, submitter_id, payload, \
     description, status, assigned_to, assigned_at, reviewed_by, reviewed_at, \
     resolution_notes, created_at, deleted_at";

pub struct WorkItemRepositoryImpl {
    db: Arc<Database>,
    applier: Arc<dyn ChangeApplier>,
}

impl WorkItemRepositoryImpl {
    pub fn new(db: Arc<Database>, applier: Arc<dyn ChangeApplier>) -> Self {
        Self { db, applier }
    }
}

#[async_trait]
impl WorkItemRepository for WorkItemRepositoryImpl {
    async fn insert_report(&self, report: NewReport) -> AppResult<WorkItem> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<WorkItem> {
            let mut conn = db.get_connection()?;

            let row = NewWorkItemRow {
                id: Uuid::new_v4(),
                kind: report.kind,
                subject_type: report.subject_type,
                subject_id: Some(report.subject_id),
                submitter_id: report.submitter_id,
                payload: None,
                description: Some(report.description),
                status: WorkItemStatus::Pending,
            };

            let inserted: WorkItemModel = diesel::insert_into(work_items::table)
                .values(&row)
                .get_result(&mut conn)?;

            Ok(inserted.to_work_item())
        })
        .await?
    }

    async fn insert_contribution(&self, contribution: NewContribution) -> AppResult<WorkItem> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<WorkItem> {
            let mut conn = db.get_connection()?;

            let row = NewWorkItemRow {
                id: Uuid::new_v4(),
                kind: WorkItemKind::ContentContribution,
                subject_type: contribution.subject_type,
                subject_id: contribution.subject_id,
                submitter_id: contribution.submitter_id,
                payload: Some(serde_json::to_value(&contribution.payload)?),
                description: None,
                status: WorkItemStatus::Pending,
            };

            let inserted: WorkItemModel = diesel::insert_into(work_items::table)
                .values(&row)
                .get_result(&mut conn)?;

            Ok(inserted.to_work_item())
        })
        .await?
    }

    async fn find_by_id(&self, item_id: Uuid) -> AppResult<Option<WorkItem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Option<WorkItem>> {
            let mut conn = db.get_connection()?;

            let model: Option<WorkItemModel> = work_items::table
                .filter(work_items::id.eq(item_id))
                .filter(work_items::deleted_at.is_null())
                .first(&mut conn)
                .optional()?;

            Ok(model.map(|m| m.to_work_item()))
        })
        .await?
    }

    async fn try_claim(
        &self,
        item_id: Uuid,
        moderator_id: Uuid,
        admin_override: bool,
        stale_cutoff: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Option<WorkItem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Option<WorkItem>> {
            let mut conn = db.get_connection()?;

            // Atomic compare-and-swap: the WHERE clause re-checks ownership
            // in the same statement that takes it, so two racing moderators
            // can never both win. A repeated claim by the current owner keeps
            // its original assigned_at. Assignments older than the visibility
            // window are fair game for any moderator, matching the
            // reassignable flag in listings.
            let result: Option<WorkItemModel> = diesel::sql_query(format!(
                "UPDATE work_items
                 SET status = CASE WHEN status = 'pending'
                                   THEN 'in_review'::work_item_status
                                   ELSE status END,
                     assigned_at = CASE WHEN assigned_to = $2
                                        THEN assigned_at
                                        ELSE NOW() END,
                     assigned_to = $2
                 WHERE id = $1
                   AND deleted_at IS NULL
                   AND status IN ('pending', 'in_review')
                   AND (assigned_to IS NULL
                        OR assigned_to = $2
                        OR $3
                        OR assigned_at < $4)
                 RETURNING {}",
                RETURNING_COLUMNS
            ))
            .bind::<diesel::sql_types::Uuid, _>(item_id)
            .bind::<diesel::sql_types::Uuid, _>(moderator_id)
            .bind::<diesel::sql_types::Bool, _>(admin_override)
            .bind::<diesel::sql_types::Timestamptz, _>(stale_cutoff)
            .get_result(&mut conn)
            .optional()?;

            Ok(result.map(|m| m.to_work_item()))
        })
        .await?
    }

    async fn release(
        &self,
        item_id: Uuid,
        expected_assignee: Option<Uuid>,
    ) -> AppResult<Option<WorkItem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Option<WorkItem>> {
            let mut conn = db.get_connection()?;

            // Guarded on the expected assignee so a release cannot clobber a
            // claim that changed hands in between.
            let result: Option<WorkItemModel> = diesel::sql_query(format!(
                "UPDATE work_items
                 SET assigned_to = NULL,
                     assigned_at = NULL,
                     status = 'pending'::work_item_status
                 WHERE id = $1
                   AND deleted_at IS NULL
                   AND status = 'in_review'
                   AND assigned_to IS NOT NULL
                   AND ($2 IS NULL OR assigned_to = $2)
                 RETURNING {}",
                RETURNING_COLUMNS
            ))
            .bind::<diesel::sql_types::Uuid, _>(item_id)
            .bind::<diesel::sql_types::Nullable<diesel::sql_types::Uuid>, _>(expected_assignee)
            .get_result(&mut conn)
            .optional()?;

            Ok(result.map(|m| m.to_work_item()))
        })
        .await?
    }

    async fn transition(
        &self,
        item_id: Uuid,
        update: TransitionUpdate,
    ) -> AppResult<Option<WorkItem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Option<WorkItem>> {
            let mut conn = db.get_connection()?;

            // The assignee guard re-checks ownership in the same statement:
            // if an admin took the claim over after the service's check, the
            // stale reviewer's write misses instead of landing.
            let result: Option<WorkItemModel> = diesel::sql_query(format!(
                "UPDATE work_items
                 SET status = $2,
                     reviewed_by = $3,
                     reviewed_at = NOW(),
                     resolution_notes = $4
                 WHERE id = $1
                   AND deleted_at IS NULL
                   AND status = 'in_review'
                   AND (assigned_to = $3 OR $5)
                 RETURNING {}",
                RETURNING_COLUMNS
            ))
            .bind::<diesel::sql_types::Uuid, _>(item_id)
            .bind::<crate::schema::sql_types::WorkItemStatus, _>(update.status)
            .bind::<diesel::sql_types::Uuid, _>(update.reviewed_by)
            .bind::<diesel::sql_types::Nullable<diesel::sql_types::Text>, _>(
                update.resolution_notes,
            )
            .bind::<diesel::sql_types::Bool, _>(update.admin_override)
            .get_result(&mut conn)
            .optional()?;

            Ok(result.map(|m| m.to_work_item()))
        })
        .await?
    }

    async fn approve_and_apply(
        &self,
        item_id: Uuid,
        reviewed_by: Uuid,
        resolution_notes: Option<String>,
        admin_override: bool,
    ) -> AppResult<Option<WorkItem>> {
        let db = Arc::clone(&self.db);
        let applier = Arc::clone(&self.applier);

        task::spawn_blocking(move || -> AppResult<Option<WorkItem>> {
            let mut conn = db.get_connection()?;

            conn.transaction::<Option<WorkItem>, AppError, _>(|conn| {
                // Row lock pins the item for the duration of the apply
                let model: Option<WorkItemModel> = work_items::table
                    .filter(work_items::id.eq(item_id))
                    .filter(work_items::deleted_at.is_null())
                    .for_update()
                    .first(conn)
                    .optional()?;

                let model = match model {
                    Some(m)
                        if m.status == WorkItemStatus::InReview
                            && (m.assigned_to == Some(reviewed_by) || admin_override) =>
                    {
                        m
                    }
                    // Not in review any more, or the claim changed hands
                    // (raced or already terminal); the service decides
                    // whether that is idempotent
                    _ => return Ok(None),
                };

                let item = model.to_work_item();
                let payload = item.parse_payload()?;

                let entity_id =
                    applier.apply(conn, item.subject_type, item.subject_id, &payload)?;

                let updated: WorkItemModel = diesel::update(work_items::table.find(item_id))
                    .set((
                        work_items::status.eq(WorkItemStatus::Approved),
                        work_items::reviewed_by.eq(reviewed_by),
                        work_items::reviewed_at.eq(diesel::dsl::now),
                        work_items::resolution_notes.eq(resolution_notes.clone()),
                        work_items::subject_id.eq(entity_id),
                    ))
                    .get_result(conn)?;

                Ok(Some(updated.to_work_item()))
            })
        })
        .await?
    }

    async fn soft_delete(&self, item_id: Uuid) -> AppResult<Option<WorkItem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Option<WorkItem>> {
            let mut conn = db.get_connection()?;

            let result: Option<WorkItemModel> = diesel::update(
                work_items::table
                    .filter(work_items::id.eq(item_id))
                    .filter(work_items::deleted_at.is_null()),
            )
            .set(work_items::deleted_at.eq(diesel::dsl::now))
            .get_result(&mut conn)
            .optional()?;

            Ok(result.map(|m| m.to_work_item()))
        })
        .await?
    }

    async fn list(&self, query: &QueueQuery) -> AppResult<Vec<QueueEntry>> {
        let db = Arc::clone(&self.db);
        let query = query.clone();

        task::spawn_blocking(move || -> AppResult<Vec<QueueEntry>> {
            let mut conn = db.get_connection()?;

            let cutoff = visibility::visibility_cutoff(query.now);

            let mut q = work_items::table
                .left_join(users::table.on(users::id.nullable().eq(work_items::assigned_to)))
                .into_boxed();

            q = q.filter(work_items::deleted_at.is_null());

            if let Some(status) = query.status {
                q = q.filter(work_items::status.eq(status));
            }
            if let Some(kind) = query.kind {
                q = q.filter(work_items::kind.eq(kind));
            }

            // Visibility rule: admins see everything; moderators see
            // unassigned items, their own claims, and foreign claims whose
            // visibility window has lapsed without resolution. The cutoff is
            // computed once per request so the page is internally consistent.
            if !query.caller.is_admin {
                q = q.filter(
                    work_items::assigned_to
                        .is_null()
                        .or(work_items::assigned_to.eq(query.caller.id))
                        .or(work_items::assigned_at.lt(cutoff).and(
                            work_items::status
                                .eq_any(vec![WorkItemStatus::Pending, WorkItemStatus::InReview]),
                        )),
                );
            }

            let rows: Vec<(WorkItemModel, Option<String>)> = q
                .select((
                    WorkItemModel::as_select(),
                    users::username.nullable(),
                ))
                .order(work_items::created_at.desc())
                .offset(query.offset)
                .limit(query.limit)
                .load(&mut conn)?;

            let entries = rows
                .into_iter()
                .map(|(model, username)| {
                    let item = model.to_work_item();
                    let reassignable = visibility::is_reassignable(
                        item.assigned_at,
                        item.status.is_terminal(),
                        query.now,
                    );
                    QueueEntry {
                        item,
                        assigned_to_username: username,
                        reassignable,
                    }
                })
                .collect();

            Ok(entries)
        })
        .await?
    }

    async fn count(&self, query: &QueueQuery) -> AppResult<u64> {
        let db = Arc::clone(&self.db);
        let query = query.clone();

        task::spawn_blocking(move || -> AppResult<u64> {
            let mut conn = db.get_connection()?;

            let cutoff = visibility::visibility_cutoff(query.now);

            let mut q = work_items::table.into_boxed();

            q = q.filter(work_items::deleted_at.is_null());

            if let Some(status) = query.status {
                q = q.filter(work_items::status.eq(status));
            }
            if let Some(kind) = query.kind {
                q = q.filter(work_items::kind.eq(kind));
            }

            if !query.caller.is_admin {
                q = q.filter(
                    work_items::assigned_to
                        .is_null()
                        .or(work_items::assigned_to.eq(query.caller.id))
                        .or(work_items::assigned_at.lt(cutoff).and(
                            work_items::status
                                .eq_any(vec![WorkItemStatus::Pending, WorkItemStatus::InReview]),
                        )),
                );
            }

            let count = q.count().get_result::<i64>(&mut conn)?;

            Ok(count as u64)
        })
        .await?
    }
}
