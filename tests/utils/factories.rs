/// Row factories for integration tests
///
/// Direct table writes for fixtures that the public services cannot produce
/// (backdated assignments, pre-existing catalog rows, identity rows).
use chrono::{Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use mamoru::modules::moderation::domain::WorkItemStatus;
use mamoru::schema::{anime, users, work_items};

use super::db;

pub fn insert_user(username: &str) -> Uuid {
    let pool = db::get_test_db_pool();
    let mut conn = pool.get().expect("Failed to get DB connection");

    let id = Uuid::new_v4();
    diesel::insert_into(users::table)
        .values((
            users::id.eq(id),
            users::username.eq(username),
            users::is_admin.eq(false),
        ))
        .execute(&mut conn)
        .expect("Failed to insert user");
    id
}

pub fn insert_anime(title: &str) -> Uuid {
    let pool = db::get_test_db_pool();
    let mut conn = pool.get().expect("Failed to get DB connection");

    let id = Uuid::new_v4();
    diesel::insert_into(anime::table)
        .values((anime::id.eq(id), anime::title.eq(title)))
        .execute(&mut conn)
        .expect("Failed to insert anime");
    id
}

/// Force an assignment with an `assigned_at` in the past, bypassing the
/// claim CAS. Used to construct stale assignments for visibility tests.
pub fn backdate_assignment(item_id: Uuid, moderator_id: Uuid, days_ago: i64) {
    let pool = db::get_test_db_pool();
    let mut conn = pool.get().expect("Failed to get DB connection");

    diesel::update(work_items::table.find(item_id))
        .set((
            work_items::status.eq(WorkItemStatus::InReview),
            work_items::assigned_to.eq(Some(moderator_id)),
            work_items::assigned_at.eq(Some(Utc::now() - Duration::days(days_ago))),
        ))
        .execute(&mut conn)
        .expect("Failed to backdate assignment");
}
