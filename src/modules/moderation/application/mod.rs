pub mod claim_service;
pub mod queue_service;
pub mod review_service;
pub mod submission_service;

pub use claim_service::ClaimService;
pub use queue_service::{QueueFilter, QueueService};
pub use review_service::ReviewService;
pub use submission_service::SubmissionService;
