/// Audit bounded context
///
/// Append-only record of every assignment and status transition in the
/// moderation queue. Audit writes are best-effort at the call sites: a
/// failed append is logged as a warning and never blocks the primary
/// operation.
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use domain::{AuditAction, AuditEntry, AuditRecorder, NewAuditEntry};
pub use infrastructure::AuditRecorderImpl;
