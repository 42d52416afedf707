/// Review state machine
///
/// One kind-parameterized machine covers both vocabularies: reports terminate
/// in resolved/dismissed, contributions in approved/rejected/needs_changes.
/// All review actions move an item out of `in_review`; the only way back to
/// `pending` is an explicit release.
use std::fmt;
use std::str::FromStr;

use super::value_objects::{WorkItemKind, WorkItemStatus};
use crate::shared::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
    NeedsChanges,
    Resolve,
    Dismiss,
}

impl ReviewAction {
    /// Terminal status this action produces for the given kind, or None when
    /// the action does not exist in that kind's vocabulary.
    pub fn target_status(&self, kind: WorkItemKind) -> Option<WorkItemStatus> {
        match (kind.is_contribution(), self) {
            (true, ReviewAction::Approve) => Some(WorkItemStatus::Approved),
            (true, ReviewAction::Reject) => Some(WorkItemStatus::Rejected),
            (true, ReviewAction::NeedsChanges) => Some(WorkItemStatus::NeedsChanges),
            (false, ReviewAction::Resolve) => Some(WorkItemStatus::Resolved),
            (false, ReviewAction::Dismiss) => Some(WorkItemStatus::Dismissed),
            _ => None,
        }
    }

    /// Rejecting or dismissing requires a non-empty resolution reason
    pub fn requires_reason(&self) -> bool {
        matches!(self, ReviewAction::Reject | ReviewAction::Dismiss)
    }

    /// Action name recorded in the audit log
    pub fn audit_action(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approved",
            ReviewAction::Reject => "rejected",
            ReviewAction::NeedsChanges => "needs_changes",
            ReviewAction::Resolve => "resolved",
            ReviewAction::Dismiss => "dismissed",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
            ReviewAction::NeedsChanges => "needs_changes",
            ReviewAction::Resolve => "resolve",
            ReviewAction::Dismiss => "dismiss",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ReviewAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" => Ok(ReviewAction::Approve),
            "reject" => Ok(ReviewAction::Reject),
            "needs_changes" => Ok(ReviewAction::NeedsChanges),
            "resolve" => Ok(ReviewAction::Resolve),
            "dismiss" => Ok(ReviewAction::Dismiss),
            _ => Err(format!("Invalid review action: {}", s)),
        }
    }
}

/// Validate a review action against the item's kind and current status,
/// returning the status to write. The caller handles the idempotent
/// approve-on-approved case before invoking this.
pub fn validate_transition(
    kind: WorkItemKind,
    current: WorkItemStatus,
    action: ReviewAction,
) -> AppResult<WorkItemStatus> {
    let target = action.target_status(kind).ok_or_else(|| {
        AppError::ValidationError(format!(
            "Action '{}' is not valid for kind '{}'",
            action, kind
        ))
    })?;

    if current != WorkItemStatus::InReview {
        return Err(AppError::ValidationError(format!(
            "Cannot {} an item in status '{}'; it must be in review",
            action, current
        )));
    }

    Ok(target)
}
