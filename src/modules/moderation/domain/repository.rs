/// Repository trait for work item persistence
///
/// Defines the storage interface for the moderation queue. The implementation
/// uses Diesel with PostgreSQL; claim and transition methods are atomic
/// conditional writes (see the concurrency notes on each method).
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entities::{NewContribution, NewReport, WorkItem};
use super::value_objects::{Caller, WorkItemKind, WorkItemStatus};
use crate::shared::errors::AppResult;

/// Terminal write performed by a review action (everything except the
/// approve-with-apply path, which has its own method). The write is guarded
/// on `reviewed_by` still holding the assignment unless `admin_override` is
/// set, so a reviewer whose claim was taken over in between cannot land a
/// stale transition.
#[derive(Debug, Clone)]
pub struct TransitionUpdate {
    pub status: WorkItemStatus,
    pub reviewed_by: Uuid,
    pub resolution_notes: Option<String>,
    pub admin_override: bool,
}

/// Parameters of a visibility-filtered listing. `now` is captured once per
/// request so the whole result set is judged against the same instant.
#[derive(Debug, Clone)]
pub struct QueueQuery {
    pub caller: Caller,
    pub status: Option<WorkItemStatus>,
    pub kind: Option<WorkItemKind>,
    pub now: DateTime<Utc>,
    pub offset: i64,
    pub limit: i64,
}

/// One listing row, enriched for moderator UIs
#[derive(Debug, Clone, serde::Serialize)]
pub struct QueueEntry {
    pub item: WorkItem,
    pub assigned_to_username: Option<String>,
    pub reassignable: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkItemRepository: Send + Sync {
    /// Persist a new report in `pending` status
    async fn insert_report(&self, report: NewReport) -> AppResult<WorkItem>;

    /// Persist a new contribution in `pending` status
    async fn insert_contribution(&self, contribution: NewContribution) -> AppResult<WorkItem>;

    /// Fetch a work item by id. Soft-deleted items are not returned.
    async fn find_by_id(&self, item_id: Uuid) -> AppResult<Option<WorkItem>>;

    /// Atomic claim: a single conditional UPDATE that succeeds only when the
    /// item is unassigned, already owned by `moderator_id`, `admin_override`
    /// is set, or the current assignment predates `stale_cutoff` (the
    /// visibility window has lapsed and the item is reassignable). Returns
    /// the updated row on success, None when the compare-and-swap missed
    /// (caller inspects the current row to build a Conflict). Never
    /// read-then-write.
    async fn try_claim(
        &self,
        item_id: Uuid,
        moderator_id: Uuid,
        admin_override: bool,
        stale_cutoff: DateTime<Utc>,
    ) -> AppResult<Option<WorkItem>>;

    /// Clear assignment and reset status to `pending`. When
    /// `expected_assignee` is Some, the update is guarded on that assignee so
    /// a racing re-claim cannot be clobbered; None is the admin path and only
    /// requires the item to be assigned.
    async fn release(
        &self,
        item_id: Uuid,
        expected_assignee: Option<Uuid>,
    ) -> AppResult<Option<WorkItem>>;

    /// Write a terminal status, guarded on the item still being `in_review`
    /// and still assigned to the reviewer (unless overridden by an admin).
    /// Returns None when the guard missed.
    async fn transition(
        &self,
        item_id: Uuid,
        update: TransitionUpdate,
    ) -> AppResult<Option<WorkItem>>;

    /// Approve a contribution and materialize its payload into the target
    /// catalog entity, in one transaction. A failed apply rolls back the
    /// status write. On entity creation the new id is back-filled into
    /// `subject_id`. Returns None when the item was no longer `in_review`,
    /// or no longer assigned to the reviewer (unless `admin_override`).
    async fn approve_and_apply(
        &self,
        item_id: Uuid,
        reviewed_by: Uuid,
        resolution_notes: Option<String>,
        admin_override: bool,
    ) -> AppResult<Option<WorkItem>>;

    /// Mark the item soft-deleted. Returns None when already deleted or absent.
    async fn soft_delete(&self, item_id: Uuid) -> AppResult<Option<WorkItem>>;

    /// Visibility-filtered listing page
    async fn list(&self, query: &QueueQuery) -> AppResult<Vec<QueueEntry>>;

    /// Total count matching the same visibility filter
    async fn count(&self, query: &QueueQuery) -> AppResult<u64>;
}
