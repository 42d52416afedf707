/// Moderation bounded context
///
/// The work-queue core: submission intake, atomic claim management, the
/// visibility window, the review state machine, and the transactional
/// approve-with-apply path into the catalog.
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::{ClaimService, QueueFilter, QueueService, ReviewService, SubmissionService};
pub use domain::{
    Caller, ContributionPayload, NewContribution, NewReport, QueueEntry, ReviewAction,
    SubjectType, WorkItem, WorkItemKind, WorkItemRepository, WorkItemStatus,
};
pub use infrastructure::WorkItemRepositoryImpl;
