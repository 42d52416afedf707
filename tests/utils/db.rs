/// Database test utilities with singleton pattern
///
/// Provides thread-safe access to the test database with proper isolation.
/// Migrations run once when the pool is first created.
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, Pool};
use diesel_migrations::MigrationHarness;
use std::sync::{Arc, Mutex, Once};

type PgPool = Pool<ConnectionManager<PgConnection>>;

static INIT: Once = Once::new();
static mut DB_POOL: Option<Arc<PgPool>> = None;

/// Get or create singleton database pool for tests
pub fn get_test_db_pool() -> Arc<PgPool> {
    unsafe {
        INIT.call_once(|| {
            dotenvy::dotenv().ok();
            let test_db_url = std::env::var("TEST_DATABASE_URL")
                .expect("TEST_DATABASE_URL must be set in .env for tests");

            let manager = ConnectionManager::<PgConnection>::new(test_db_url);
            let pool = r2d2::Pool::builder()
                .max_size(10)
                .build(manager)
                .expect("Failed to create test database pool");

            let mut conn = pool.get().expect("Failed to get DB connection");
            conn.run_pending_migrations(mamoru::MIGRATIONS)
                .expect("Failed to run test migrations");

            DB_POOL = Some(Arc::new(pool));
        });

        DB_POOL.as_ref().unwrap().clone()
    }
}

/// Clean all test tables - use at the start of each test
pub fn clean_test_db() {
    let pool = get_test_db_pool();
    let mut conn = pool.get().expect("Failed to get DB connection");

    for table in [
        "audit_log",
        "work_items",
        "users",
        "anime",
        "manga",
        "novels",
        "donghua",
        "manhua",
        "manhwa",
        "fan_comics",
        "characters",
        "staff_members",
        "voice_actors",
        "studios",
        "genres",
    ] {
        diesel::sql_query(format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", table))
            .execute(&mut conn)
            .unwrap_or_else(|e| panic!("Failed to clean {}: {}", table, e));
    }
}

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Acquire test lock to ensure tests run serially
/// Returns a guard that releases the lock when dropped
pub fn acquire_test_lock() -> std::sync::MutexGuard<'static, ()> {
    // Handle poisoned mutex by recovering from panic
    match TEST_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
