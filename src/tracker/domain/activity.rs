//! Append-only activity log entries.

use super::{ActivityId, ProjectId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of change an activity entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// A project was created.
    CreatedProject,
    /// A project was deleted.
    DeletedProject,
    /// A user joined a project team.
    AddedTeamMember,
    /// A user left a project team.
    RemovedTeamMember,
    /// A task was created.
    CreatedTask,
    /// A task was deleted.
    DeletedTask,
    /// A task moved to another status.
    ChangedTaskStatus,
    /// A task received a new assignee.
    AssignedTask,
    /// A task lost its assignee.
    UnassignedTask,
    /// A task priority changed.
    ChangedTaskPriority,
    /// A comment was posted.
    AddedComment,
    /// A comment was deleted.
    DeletedComment,
}

impl ActivityAction {
    /// Returns the short label stored with each entry.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreatedProject => "created project",
            Self::DeletedProject => "deleted project",
            Self::AddedTeamMember => "added team member",
            Self::RemovedTeamMember => "removed team member",
            Self::CreatedTask => "created task",
            Self::DeletedTask => "deleted task",
            Self::ChangedTaskStatus => "changed task status",
            Self::AssignedTask => "assigned task",
            Self::UnassignedTask => "unassigned task",
            Self::ChangedTaskPriority => "changed task priority",
            Self::AddedComment => "added comment",
            Self::DeletedComment => "deleted comment",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned while parsing activity labels from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown activity action: {0}")]
pub struct ParseActivityActionError(pub String);

impl TryFrom<&str> for ActivityAction {
    type Error = ParseActivityActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "created project" => Ok(Self::CreatedProject),
            "deleted project" => Ok(Self::DeletedProject),
            "added team member" => Ok(Self::AddedTeamMember),
            "removed team member" => Ok(Self::RemovedTeamMember),
            "created task" => Ok(Self::CreatedTask),
            "deleted task" => Ok(Self::DeletedTask),
            "changed task status" => Ok(Self::ChangedTaskStatus),
            "assigned task" => Ok(Self::AssignedTask),
            "unassigned task" => Ok(Self::UnassignedTask),
            "changed task priority" => Ok(Self::ChangedTaskPriority),
            "added comment" => Ok(Self::AddedComment),
            "deleted comment" => Ok(Self::DeletedComment),
            _ => Err(ParseActivityActionError(value.to_owned())),
        }
    }
}

/// An immutable record of one observed change inside a project.
///
/// Entries keep only identifiers of the entities they mention, so they
/// outlive deleted tasks, comments and projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    id: ActivityId,
    project_id: ProjectId,
    actor: UserId,
    action: ActivityAction,
    details: String,
    timestamp: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted activity entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedActivityData {
    /// Persisted entry identifier.
    pub id: ActivityId,
    /// Persisted project the entry belongs to.
    pub project_id: ProjectId,
    /// Persisted acting user.
    pub actor: UserId,
    /// Persisted action.
    pub action: ActivityAction,
    /// Persisted human-readable details.
    pub details: String,
    /// Persisted timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    /// Creates a new entry.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        actor: UserId,
        action: ActivityAction,
        details: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            project_id,
            actor,
            action,
            details: details.into(),
            timestamp,
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedActivityData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            actor: data.actor,
            action: data.action,
            details: data.details,
            timestamp: data.timestamp,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the project the entry belongs to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor(&self) -> UserId {
        self.actor
    }

    /// Returns the action.
    #[must_use]
    pub const fn action(&self) -> ActivityAction {
        self.action
    }

    /// Returns the human-readable details.
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Returns when the change happened.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
