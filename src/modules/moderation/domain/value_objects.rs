use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Work item kind enum matching database type
#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::WorkItemKind"]
#[serde(rename_all = "snake_case")]
pub enum WorkItemKind {
    #[db_rename = "content_report"]
    ContentReport,
    #[db_rename = "content_contribution"]
    ContentContribution,
    #[db_rename = "review_report"]
    ReviewReport,
    #[db_rename = "user_report"]
    UserReport,
}

impl WorkItemKind {
    /// Contributions carry a payload of proposed field changes; everything
    /// else is a report with a free-text description.
    pub fn is_contribution(&self) -> bool {
        matches!(self, WorkItemKind::ContentContribution)
    }

    pub fn is_report(&self) -> bool {
        !self.is_contribution()
    }

    pub fn db_value(&self) -> &'static str {
        match self {
            WorkItemKind::ContentReport => "content_report",
            WorkItemKind::ContentContribution => "content_contribution",
            WorkItemKind::ReviewReport => "review_report",
            WorkItemKind::UserReport => "user_report",
        }
    }
}

impl fmt::Display for WorkItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.db_value())
    }
}

impl FromStr for WorkItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "content_report" => Ok(WorkItemKind::ContentReport),
            "content_contribution" => Ok(WorkItemKind::ContentContribution),
            "review_report" => Ok(WorkItemKind::ReviewReport),
            "user_report" => Ok(WorkItemKind::UserReport),
            _ => Err(format!("Invalid work item kind: {}", s)),
        }
    }
}

/// Review lifecycle status enum matching database type
#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::WorkItemStatus"]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    #[db_rename = "pending"]
    Pending,
    #[db_rename = "in_review"]
    InReview,
    #[db_rename = "approved"]
    Approved,
    #[db_rename = "rejected"]
    Rejected,
    #[db_rename = "needs_changes"]
    NeedsChanges,
    #[db_rename = "resolved"]
    Resolved,
    #[db_rename = "dismissed"]
    Dismissed,
}

impl WorkItemStatus {
    /// Terminal states are immutable except for soft-delete.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkItemStatus::Approved
                | WorkItemStatus::Rejected
                | WorkItemStatus::NeedsChanges
                | WorkItemStatus::Resolved
                | WorkItemStatus::Dismissed
        )
    }

    pub fn db_value(&self) -> &'static str {
        match self {
            WorkItemStatus::Pending => "pending",
            WorkItemStatus::InReview => "in_review",
            WorkItemStatus::Approved => "approved",
            WorkItemStatus::Rejected => "rejected",
            WorkItemStatus::NeedsChanges => "needs_changes",
            WorkItemStatus::Resolved => "resolved",
            WorkItemStatus::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.db_value())
    }
}

impl FromStr for WorkItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(WorkItemStatus::Pending),
            "in_review" => Ok(WorkItemStatus::InReview),
            "approved" => Ok(WorkItemStatus::Approved),
            "rejected" => Ok(WorkItemStatus::Rejected),
            "needs_changes" => Ok(WorkItemStatus::NeedsChanges),
            "resolved" => Ok(WorkItemStatus::Resolved),
            "dismissed" => Ok(WorkItemStatus::Dismissed),
            _ => Err(format!("Invalid work item status: {}", s)),
        }
    }
}

/// Polymorphic reference target of a report or contribution
#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::SubjectType"]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    #[db_rename = "anime"]
    Anime,
    #[db_rename = "manga"]
    Manga,
    #[db_rename = "novel"]
    Novel,
    #[db_rename = "donghua"]
    Donghua,
    #[db_rename = "manhua"]
    Manhua,
    #[db_rename = "manhwa"]
    Manhwa,
    #[db_rename = "fan_comic"]
    FanComic,
    #[db_rename = "character"]
    Character,
    #[db_rename = "staff"]
    Staff,
    #[db_rename = "voice_actor"]
    VoiceActor,
    #[db_rename = "studio"]
    Studio,
    #[db_rename = "genre"]
    Genre,
    #[db_rename = "review"]
    Review,
    #[db_rename = "user"]
    User,
}

impl SubjectType {
    /// Catalog entity types the Change Applier can materialize into.
    /// Reviews and users are report-only subjects.
    pub fn is_catalog_entity(&self) -> bool {
        !matches!(self, SubjectType::Review | SubjectType::User)
    }

    pub fn db_value(&self) -> &'static str {
        match self {
            SubjectType::Anime => "anime",
            SubjectType::Manga => "manga",
            SubjectType::Novel => "novel",
            SubjectType::Donghua => "donghua",
            SubjectType::Manhua => "manhua",
            SubjectType::Manhwa => "manhwa",
            SubjectType::FanComic => "fan_comic",
            SubjectType::Character => "character",
            SubjectType::Staff => "staff",
            SubjectType::VoiceActor => "voice_actor",
            SubjectType::Studio => "studio",
            SubjectType::Genre => "genre",
            SubjectType::Review => "review",
            SubjectType::User => "user",
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.db_value())
    }
}

impl FromStr for SubjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anime" => Ok(SubjectType::Anime),
            "manga" => Ok(SubjectType::Manga),
            "novel" => Ok(SubjectType::Novel),
            "donghua" => Ok(SubjectType::Donghua),
            "manhua" => Ok(SubjectType::Manhua),
            "manhwa" => Ok(SubjectType::Manhwa),
            "fan_comic" => Ok(SubjectType::FanComic),
            "character" => Ok(SubjectType::Character),
            "staff" => Ok(SubjectType::Staff),
            "voice_actor" => Ok(SubjectType::VoiceActor),
            "studio" => Ok(SubjectType::Studio),
            "genre" => Ok(SubjectType::Genre),
            "review" => Ok(SubjectType::Review),
            "user" => Ok(SubjectType::User),
            _ => Err(format!("Invalid subject type: {}", s)),
        }
    }
}

/// Explicit caller identity threaded through every operation.
/// Role flags come from the external auth layer; there is no ambient
/// session state in this subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: Uuid,
    pub is_moderator: bool,
    pub is_admin: bool,
}

impl Caller {
    pub fn user(id: Uuid) -> Self {
        Self {
            id,
            is_moderator: false,
            is_admin: false,
        }
    }

    pub fn moderator(id: Uuid) -> Self {
        Self {
            id,
            is_moderator: true,
            is_admin: false,
        }
    }

    pub fn admin(id: Uuid) -> Self {
        Self {
            id,
            is_moderator: true,
            is_admin: true,
        }
    }
}
