//! Store port: entity lookups, listings and atomic change sets.

use super::query::{Page, PageRequest, ProjectQuery, TaskQuery};
use crate::tracker::domain::{
    Activity, Comment, CommentId, Project, ProjectId, Task, TaskId, User, UserId, Username,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for store operations.
pub type TrackerStoreResult<T> = Result<T, TrackerStoreError>;

/// One entity write inside a [`ChangeSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Insert a newly registered user.
    InsertUser(User),
    /// Insert a new project with its team.
    InsertProject(Project),
    /// Overwrite an existing project and its team.
    UpdateProject(Project),
    /// Delete a project together with its tasks and their comments.
    DeleteProject(ProjectId),
    /// Insert a new task.
    InsertTask(Task),
    /// Overwrite an existing task.
    UpdateTask(Task),
    /// Delete a task together with its comments.
    DeleteTask(TaskId),
    /// Insert a new comment.
    InsertComment(Comment),
    /// Overwrite an existing comment.
    UpdateComment(Comment),
    /// Delete a comment.
    DeleteComment(CommentId),
}

/// Entity writes plus the activity entries describing them.
///
/// Stores apply a change set all-or-nothing: either every change and every
/// activity entry becomes visible, or none does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
    activities: Vec<Activity>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entity write.
    #[must_use]
    pub fn with(mut self, change: Change) -> Self {
        self.changes.push(change);
        self
    }

    /// Appends an entity write in place.
    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Appends activity entries.
    pub fn record(&mut self, activities: impl IntoIterator<Item = Activity>) {
        self.activities.extend(activities);
    }

    /// Returns the entity writes in application order.
    #[must_use]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Returns the activity entries to append.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Splits the set into its writes and entries.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Change>, Vec<Activity>) {
        (self.changes, self.activities)
    }
}

/// Persistence contract for the tracker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackerStore: Send + Sync {
    /// Finds a user by identifier.
    async fn find_user(&self, id: UserId) -> TrackerStoreResult<Option<User>>;

    /// Finds a user by unique handle.
    async fn find_user_by_username(&self, username: &Username)
    -> TrackerStoreResult<Option<User>>;

    /// Finds a project by identifier.
    async fn find_project(&self, id: ProjectId) -> TrackerStoreResult<Option<Project>>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: TaskId) -> TrackerStoreResult<Option<Task>>;

    /// Finds a comment by identifier.
    async fn find_comment(&self, id: CommentId) -> TrackerStoreResult<Option<Comment>>;

    /// Lists projects matching `query`, newest first.
    async fn list_projects(
        &self,
        query: &ProjectQuery,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Project>>;

    /// Lists tasks matching `query`, newest first.
    ///
    /// When `query.visible_to` is set only tasks of projects that user
    /// belongs to are returned.
    async fn list_tasks(&self, query: &TaskQuery, page: PageRequest)
    -> TrackerStoreResult<Page<Task>>;

    /// Returns every task of `project_id` currently assigned to `user_id`.
    async fn find_assigned_tasks(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> TrackerStoreResult<Vec<Task>>;

    /// Lists the comments of a task, newest first.
    async fn list_comments(
        &self,
        task_id: TaskId,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Comment>>;

    /// Lists the activity entries of a project, newest first.
    async fn list_activities(
        &self,
        project_id: ProjectId,
        page: PageRequest,
    ) -> TrackerStoreResult<Page<Activity>>;

    /// Applies `changes` atomically.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Duplicate`] or
    /// [`TrackerStoreError::DuplicateUsername`] when an insert collides,
    /// [`TrackerStoreError::NotFound`] when an update, delete or referenced
    /// parent is missing, [`TrackerStoreError::AssigneeNotMember`] when a
    /// task would end up assigned to someone outside its project's team, or
    /// [`TrackerStoreError::Persistence`] on
    /// infrastructure failure. Nothing is applied when an error is returned.
    async fn commit(&self, changes: ChangeSet) -> TrackerStoreResult<()>;
}

/// Kind of stored record named by a store error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// User record.
    User,
    /// Project record.
    Project,
    /// Task record.
    Task,
    /// Comment record.
    Comment,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Task => "task",
            Self::Comment => "comment",
        })
    }
}

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerStoreError {
    /// A record with the same identifier already exists.
    #[error("duplicate {kind} identifier: {id}")]
    Duplicate {
        /// Kind of record.
        kind: RecordKind,
        /// Colliding identifier.
        id: Uuid,
    },

    /// The username is already registered.
    #[error("username already taken: {0}")]
    DuplicateUsername(Username),

    /// The record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of record.
        kind: RecordKind,
        /// Missing identifier.
        id: Uuid,
    },

    /// A task would keep an assignee who is not on its project's team once
    /// the change set is applied.
    #[error("user {user_id} is assigned a task in project {project_id} but is not a member")]
    AssigneeNotMember {
        /// Project owning the task.
        project_id: ProjectId,
        /// Offending assignee.
        user_id: UserId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a not-found error.
    #[must_use]
    pub fn not_found(kind: RecordKind, id: impl AsRef<Uuid>) -> Self {
        Self::NotFound {
            kind,
            id: *id.as_ref(),
        }
    }

    /// Builds a duplicate-identifier error.
    #[must_use]
    pub fn duplicate(kind: RecordKind, id: impl AsRef<Uuid>) -> Self {
        Self::Duplicate {
            kind,
            id: *id.as_ref(),
        }
    }
}
