pub mod entities;
pub mod repository;
pub mod state_machine;
pub mod value_objects;
pub mod visibility;

pub use entities::{ContributionPayload, NewContribution, NewReport, WorkItem};
pub use repository::{QueueEntry, QueueQuery, TransitionUpdate, WorkItemRepository};
pub use state_machine::ReviewAction;
pub use value_objects::{Caller, SubjectType, WorkItemKind, WorkItemStatus};
