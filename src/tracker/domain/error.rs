//! Error types for tracker domain validation and parsing.

use super::{ProjectId, TaskId, TaskStatus, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating tracker aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username contains characters outside letters, digits and `@.+-_`.
    #[error("username '{0}' may only contain letters, digits and @/./+/-/_")]
    InvalidUsername(String),

    /// The username exceeds the 150-character storage limit.
    #[error("username exceeds 150 character limit: {0}")]
    UsernameTooLong(String),

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The project name exceeds the 200-character storage limit.
    #[error("project name exceeds 200 character limit: {0}")]
    ProjectNameTooLong(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The task title exceeds the 200-character storage limit.
    #[error("task title exceeds 200 character limit: {0}")]
    TaskTitleTooLong(String),

    /// The comment text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyCommentText,

    /// A task may only be assigned to a member of its project's team.
    #[error("user {user_id} is not a member of project {project_id}")]
    AssigneeNotMember {
        /// Project owning the task.
        project_id: ProjectId,
        /// Rejected assignee.
        user_id: UserId,
    },

    /// The requested status change is not an edge of the transition table.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task whose status change was rejected.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The project creator is always a team member and cannot be removed.
    #[error("user {user_id} created project {project_id} and cannot be removed from its team")]
    CreatorRemoval {
        /// Project whose team was being edited.
        project_id: ProjectId,
        /// The project creator.
        user_id: UserId,
    },
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
