//! Domain model for the project tracker.
//!
//! Aggregates (users, projects, tasks, comments), the append-only activity
//! log, the task status state machine and the access-control rules. Nothing
//! in this module performs I/O.

mod activity;
mod comment;
mod error;
mod ids;
mod permission;
mod project;
mod recorder;
mod task;
mod user;

pub use activity::{Activity, ActivityAction, ParseActivityActionError, PersistedActivityData};
pub use comment::{Comment, CommentText, PersistedCommentData};
pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TrackerDomainError};
pub use ids::{ActivityId, CommentId, ProjectId, TaskId, UserId};
pub use permission::{AccessDenied, Action, EntityKind, Resource, authorize, is_allowed};
pub use project::{PersistedProjectData, Project, ProjectName};
pub use recorder::{ActivityRecorder, EntityChange, Snapshot, UserNames};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskPriority, TaskStatus, TaskTitle};
pub use user::{EmailAddress, PersistedUserData, User, Username};
