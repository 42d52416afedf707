pub mod entities;
pub mod repository;

pub use entities::{AuditAction, AuditEntry, NewAuditEntry};
pub use repository::AuditRecorder;
