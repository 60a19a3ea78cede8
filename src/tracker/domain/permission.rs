//! Access-control predicates keyed by entity kind and action.
//!
//! Every (kind, action) pair without an explicit rule is denied.

use super::{Comment, Project, Task, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of entity an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A project.
    Project,
    /// A task.
    Task,
    /// A comment.
    Comment,
}

impl EntityKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Task => "task",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation a user attempts on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// View the entity.
    Read,
    /// Change ordinary fields.
    Update,
    /// Remove the entity.
    Delete,
    /// Add a user to a project team.
    AddMember,
    /// Remove a user from a project team.
    RemoveMember,
    /// Create a task inside a project.
    CreateTask,
    /// Move a task along its status lifecycle.
    ChangeStatus,
    /// Set a task assignee.
    Assign,
    /// Clear a task assignee.
    Unassign,
    /// Post a comment on a task.
    AddComment,
    /// Change a comment body.
    Edit,
}

impl Action {
    /// Returns the snake-case name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::AddMember => "add_member",
            Self::RemoveMember => "remove_member",
            Self::CreateTask => "create_task",
            Self::ChangeStatus => "change_status",
            Self::Assign => "assign",
            Self::Unassign => "unassign",
            Self::AddComment => "add_comment",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity under evaluation together with the context its rules depend on.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// A project.
    Project(&'a Project),
    /// A task and its owning project.
    Task {
        /// The task.
        task: &'a Task,
        /// Project owning the task.
        project: &'a Project,
    },
    /// A comment, its task and the task's project.
    Comment {
        /// The comment.
        comment: &'a Comment,
        /// Commented task.
        task: &'a Task,
        /// Project owning the task.
        project: &'a Project,
    },
}

impl Resource<'_> {
    /// Returns the kind of the evaluated entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Project(_) => EntityKind::Project,
            Self::Task { .. } => EntityKind::Task,
            Self::Comment { .. } => EntityKind::Comment,
        }
    }

    /// Whether the borrowed context actually belongs together.
    fn is_consistent(&self) -> bool {
        match self {
            Self::Project(_) => true,
            Self::Task { task, project } => task.project_id() == project.id(),
            Self::Comment {
                comment,
                task,
                project,
            } => comment.task_id() == task.id() && task.project_id() == project.id(),
        }
    }
}

/// Access was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("user {actor} may not {action} this {kind}")]
pub struct AccessDenied {
    /// User who attempted the action.
    pub actor: UserId,
    /// Kind of entity targeted.
    pub kind: EntityKind,
    /// Attempted action.
    pub action: Action,
}

/// Returns whether `actor` may perform `action` on `resource`.
#[must_use]
pub fn is_allowed(actor: UserId, resource: Resource<'_>, action: Action) -> bool {
    if !resource.is_consistent() {
        return false;
    }
    match (resource, action) {
        (Resource::Project(project), Action::Read | Action::CreateTask) => {
            project.is_member(actor)
        }
        (
            Resource::Project(project),
            Action::Update | Action::Delete | Action::AddMember | Action::RemoveMember,
        ) => project.is_creator(actor),
        (Resource::Task { project, .. }, Action::Read | Action::AddComment) => {
            project.is_member(actor)
        }
        (
            Resource::Task { task, project },
            Action::Update
            | Action::Delete
            | Action::ChangeStatus
            | Action::Assign
            | Action::Unassign,
        ) => {
            task.created_by() == actor
                || task.assigned_to() == Some(actor)
                || project.is_creator(actor)
        }
        (Resource::Comment { project, .. }, Action::Read) => project.is_member(actor),
        (Resource::Comment { comment, .. }, Action::Edit | Action::Delete) => {
            comment.author() == actor
        }
        _ => false,
    }
}

/// Checks that `actor` may perform `action` on `resource`.
///
/// # Errors
///
/// Returns [`AccessDenied`] when no rule grants the action.
pub fn authorize(actor: UserId, resource: Resource<'_>, action: Action) -> Result<(), AccessDenied> {
    if is_allowed(actor, resource, action) {
        Ok(())
    } else {
        Err(AccessDenied {
            actor,
            kind: resource.kind(),
            action,
        })
    }
}
