/// Visibility filter
///
/// A claimed item is invisible to other moderators while its claim is fresh.
/// Once the assignment is older than the visibility window and the item is
/// still unresolved, it reopens to the whole moderator pool so a case cannot
/// be hoarded silently. Pure predicate over assignment state and a caller
/// identity; the listing query mirrors it in SQL against a single `now`
/// captured per request.
use chrono::{DateTime, Duration, Utc};

use super::entities::WorkItem;
use super::value_objects::Caller;

/// Days after which an unresolved assignment reopens to all moderators
pub const VISIBILITY_WINDOW_DAYS: i64 = 15;

pub fn visibility_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(VISIBILITY_WINDOW_DAYS)
}

/// Whether the item shows up in `caller`'s listings at instant `now`
pub fn is_visible_to(item: &WorkItem, caller: &Caller, now: DateTime<Utc>) -> bool {
    if item.is_deleted() {
        return false;
    }
    if caller.is_admin {
        return true;
    }
    match (item.assigned_to, item.assigned_at) {
        (None, _) => true,
        (Some(assignee), _) if assignee == caller.id => true,
        (Some(_), Some(assigned_at)) => {
            assigned_at < visibility_cutoff(now) && !item.status.is_terminal()
        }
        // assigned_to without assigned_at violates the store invariant;
        // treat as hidden rather than guessing an age
        (Some(_), None) => false,
    }
}

/// Whether another moderator could take this item over: assigned, unresolved,
/// and the visibility window has elapsed
pub fn is_reassignable(
    assigned_at: Option<DateTime<Utc>>,
    status_terminal: bool,
    now: DateTime<Utc>,
) -> bool {
    match assigned_at {
        Some(at) => at < visibility_cutoff(now) && !status_terminal,
        None => false,
    }
}
