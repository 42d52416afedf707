// Shared Kernel - Domain Driven Design
// Concerns used across every bounded context of the moderation backend.

pub mod application; // Shared application layer patterns
pub mod errors; // Shared error types
pub mod infrastructure; // Shared infrastructure (database, logging)
pub mod utils; // Shared utilities

// Re-exports for convenience
pub use infrastructure::database::{Database, DbConnection, DbPool};
