/// Queue listing service
///
/// Visibility-filtered views of the moderation queue. The reference instant
/// is captured once per request so every row on a page (and its count) is
/// judged against the same cutoff.
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::modules::moderation::domain::visibility::is_visible_to;
use crate::modules::moderation::domain::{
    Caller, QueueEntry, QueueQuery, WorkItem, WorkItemKind, WorkItemRepository, WorkItemStatus,
};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::validation::Validator;

/// Optional listing filters, applied on top of the visibility window
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueFilter {
    pub status: Option<WorkItemStatus>,
    pub kind: Option<WorkItemKind>,
}

pub struct QueueService {
    repository: Arc<dyn WorkItemRepository>,
}

impl QueueService {
    pub fn new(repository: Arc<dyn WorkItemRepository>) -> Self {
        Self { repository }
    }

    /// List the queue as seen by `caller`. Non-admin moderators see
    /// unassigned items, their own assignments, and foreign assignments
    /// older than the visibility window; admins see everything.
    pub async fn list(
        &self,
        caller: &Caller,
        filter: QueueFilter,
        pagination: PaginationParams,
    ) -> AppResult<PaginatedResult<QueueEntry>> {
        if !caller.is_moderator {
            return Err(AppError::Forbidden("Moderator role required".to_string()));
        }
        Validator::validate_pagination(pagination.offset(), pagination.limit())?;

        let query = QueueQuery {
            caller: *caller,
            status: filter.status,
            kind: filter.kind,
            now: Utc::now(),
            offset: pagination.offset(),
            limit: pagination.limit(),
        };

        let entries = self.repository.list(&query).await?;
        let total = self.repository.count(&query).await?;
        Ok(PaginatedResult::new(entries, total, &pagination))
    }

    /// Fetch a single item, subject to the same visibility rules as the
    /// listing. Hidden items read as not found rather than forbidden so
    /// their assignment state is not leaked.
    pub async fn get(&self, caller: &Caller, item_id: Uuid) -> AppResult<WorkItem> {
        if !caller.is_moderator {
            return Err(AppError::Forbidden("Moderator role required".to_string()));
        }

        let item = self
            .repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Work item {} not found", item_id)))?;

        if !is_visible_to(&item, caller, Utc::now()) {
            return Err(AppError::NotFound(format!(
                "Work item {} not found",
                item_id
            )));
        }
        Ok(item)
    }
}
