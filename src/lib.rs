pub mod modules;
pub mod schema;
pub mod shared;

use std::sync::Arc;

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use modules::audit::{AuditRecorder, AuditRecorderImpl};
use modules::catalog::infrastructure::CatalogApplier;
use modules::moderation::application::{
    ClaimService, QueueService, ReviewService, SubmissionService,
};
use modules::moderation::domain::WorkItemRepository;
use modules::moderation::infrastructure::WorkItemRepositoryImpl;
use shared::errors::{AppError, AppResult};
use shared::Database;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Fully wired moderation subsystem over one connection pool.
/// Construct once at startup and share via clone of the Arcs.
pub struct ModerationStack {
    pub submissions: Arc<SubmissionService>,
    pub claims: Arc<ClaimService>,
    pub reviews: Arc<ReviewService>,
    pub queue: Arc<QueueService>,
    pub audit: Arc<dyn AuditRecorder>,
    pub repository: Arc<dyn WorkItemRepository>,
}

impl ModerationStack {
    pub fn new(database: Arc<Database>) -> Self {
        let applier = Arc::new(CatalogApplier::new());
        let repository: Arc<dyn WorkItemRepository> =
            Arc::new(WorkItemRepositoryImpl::new(Arc::clone(&database), applier));
        let audit: Arc<dyn AuditRecorder> = Arc::new(AuditRecorderImpl::new(database));

        Self {
            submissions: Arc::new(SubmissionService::new(
                Arc::clone(&repository),
                Arc::clone(&audit),
            )),
            claims: Arc::new(ClaimService::new(
                Arc::clone(&repository),
                Arc::clone(&audit),
            )),
            reviews: Arc::new(ReviewService::new(
                Arc::clone(&repository),
                Arc::clone(&audit),
            )),
            queue: Arc::new(QueueService::new(Arc::clone(&repository))),
            audit,
            repository,
        }
    }
}

/// Apply any pending embedded migrations. Called once at startup, before
/// the stack takes traffic.
pub fn run_migrations(database: &Database) -> AppResult<()> {
    let mut conn = database.get_connection()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))?;
    crate::log_info!("Database migrations are up to date");
    Ok(())
}
