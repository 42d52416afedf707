/// Queue listing tests - database operations
///
/// Tests cover:
/// - Visibility window for foreign assignments
/// - Admin bypass
/// - Status/kind filters and pagination
/// - Username enrichment and the reassignable flag
mod utils;

use std::sync::Arc;

use mamoru::modules::moderation::application::QueueFilter;
use mamoru::modules::moderation::domain::{Caller, SubjectType, WorkItem, WorkItemKind, WorkItemStatus};
use mamoru::shared::application::PaginationParams;
use mamoru::shared::Database;
use mamoru::ModerationStack;
use utils::{db, factories};

fn stack() -> ModerationStack {
    let pool = db::get_test_db_pool();
    ModerationStack::new(Arc::new(Database::from_pool((*pool).clone())))
}

async fn submit_report(stack: &ModerationStack, kind: WorkItemKind) -> WorkItem {
    let (subject_type, description) = match kind {
        WorkItemKind::UserReport => (SubjectType::User, "Abusive private messages"),
        WorkItemKind::ReviewReport => (SubjectType::Review, "Spam review with external links"),
        _ => (SubjectType::Anime, "Wrong studio credited for season two"),
    };
    stack
        .submissions
        .submit_report(
            None,
            kind,
            subject_type,
            uuid::Uuid::new_v4(),
            description.to_string(),
        )
        .await
        .unwrap()
}

async fn list_ids(
    stack: &ModerationStack,
    caller: &Caller,
    filter: QueueFilter,
) -> Vec<uuid::Uuid> {
    stack
        .queue
        .list(caller, filter, PaginationParams::default())
        .await
        .unwrap()
        .items
        .into_iter()
        .map(|entry| entry.item.id)
        .collect()
}

#[tokio::test]
async fn fresh_foreign_assignment_is_hidden() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let stack = stack();
    let holder = Caller::moderator(uuid::Uuid::new_v4());
    let viewer = Caller::moderator(uuid::Uuid::new_v4());

    let visible = submit_report(&stack, WorkItemKind::ContentReport).await;
    let held = submit_report(&stack, WorkItemKind::ContentReport).await;
    stack.claims.assign(&holder, held.id).await.unwrap();

    let ids = list_ids(&stack, &viewer, QueueFilter::default()).await;
    assert!(ids.contains(&visible.id));
    assert!(!ids.contains(&held.id));

    // The holder still sees their own assignment
    let holder_ids = list_ids(&stack, &holder, QueueFilter::default()).await;
    assert!(holder_ids.contains(&held.id));
}

#[tokio::test]
async fn stale_foreign_assignment_reappears_as_reassignable() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let stack = stack();
    let holder_id = uuid::Uuid::new_v4();
    let viewer = Caller::moderator(uuid::Uuid::new_v4());

    let stale = submit_report(&stack, WorkItemKind::ContentReport).await;
    factories::backdate_assignment(stale.id, holder_id, 16);

    let fresh = submit_report(&stack, WorkItemKind::ContentReport).await;
    factories::backdate_assignment(fresh.id, holder_id, 10);

    let page = stack
        .queue
        .list(&viewer, QueueFilter::default(), PaginationParams::default())
        .await
        .unwrap();

    let stale_entry = page
        .items
        .iter()
        .find(|e| e.item.id == stale.id)
        .expect("stale assignment visible");
    assert!(stale_entry.reassignable);
    assert!(!page.items.iter().any(|e| e.item.id == fresh.id));
}

#[tokio::test]
async fn admin_sees_everything_including_fresh_assignments() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let stack = stack();
    let holder = Caller::moderator(uuid::Uuid::new_v4());
    let admin = Caller::admin(uuid::Uuid::new_v4());

    let held = submit_report(&stack, WorkItemKind::ContentReport).await;
    stack.claims.assign(&holder, held.id).await.unwrap();

    let ids = list_ids(&stack, &admin, QueueFilter::default()).await;
    assert!(ids.contains(&held.id));
}

#[tokio::test]
async fn status_and_kind_filters_narrow_the_listing() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let stack = stack();
    let moderator = Caller::moderator(uuid::Uuid::new_v4());

    let content = submit_report(&stack, WorkItemKind::ContentReport).await;
    let user_report = submit_report(&stack, WorkItemKind::UserReport).await;
    stack.claims.assign(&moderator, user_report.id).await.unwrap();

    let pending_only = list_ids(
        &stack,
        &moderator,
        QueueFilter {
            status: Some(WorkItemStatus::Pending),
            kind: None,
        },
    )
    .await;
    assert!(pending_only.contains(&content.id));
    assert!(!pending_only.contains(&user_report.id));

    let user_reports_only = list_ids(
        &stack,
        &moderator,
        QueueFilter {
            status: None,
            kind: Some(WorkItemKind::UserReport),
        },
    )
    .await;
    assert_eq!(user_reports_only, vec![user_report.id]);
}

#[tokio::test]
async fn listing_joins_assignee_username() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let stack = stack();
    let moderator = Caller::moderator(factories::insert_user("sakura_mod"));

    let item = submit_report(&stack, WorkItemKind::ContentReport).await;
    stack.claims.assign(&moderator, item.id).await.unwrap();

    let page = stack
        .queue
        .list(&moderator, QueueFilter::default(), PaginationParams::default())
        .await
        .unwrap();
    let entry = page.items.iter().find(|e| e.item.id == item.id).unwrap();
    assert_eq!(entry.assigned_to_username.as_deref(), Some("sakura_mod"));
}

#[tokio::test]
async fn pagination_reports_totals_across_pages() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let stack = stack();
    let moderator = Caller::moderator(uuid::Uuid::new_v4());

    for _ in 0..5 {
        submit_report(&stack, WorkItemKind::ContentReport).await;
    }

    let page = stack
        .queue
        .list(
            &moderator,
            QueueFilter::default(),
            PaginationParams::new(2, 2),
        )
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_count, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 2);
}

#[tokio::test]
async fn soft_deleted_items_disappear_from_listing() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let stack = stack();
    let moderator = Caller::moderator(uuid::Uuid::new_v4());
    let admin = Caller::admin(uuid::Uuid::new_v4());

    let item = submit_report(&stack, WorkItemKind::ContentReport).await;
    stack.submissions.soft_delete(&admin, item.id).await.unwrap();

    let ids = list_ids(&stack, &moderator, QueueFilter::default()).await;
    assert!(!ids.contains(&item.id));
    assert!(stack.repository.find_by_id(item.id).await.unwrap().is_none());
}

#[tokio::test]
async fn non_moderators_cannot_list_the_queue() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let stack = stack();
    let err = stack
        .queue
        .list(
            &Caller::user(uuid::Uuid::new_v4()),
            QueueFilter::default(),
            PaginationParams::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        mamoru::shared::errors::AppError::Forbidden(_)
    ));
}
