//! Mutation orchestration for the tracker.
//!
//! Every mutating operation follows the same sequence: load the target,
//! evaluate permissions, validate and apply the change on the aggregate,
//! derive activity entries from the before/after snapshots, and commit the
//! entity writes and the entries as one [`ChangeSet`].

mod activity;
mod comments;
mod error;
mod projects;
mod requests;
mod tasks;
mod users;

pub use error::{FailureKind, TrackerError, TrackerResult};
pub use requests::{
    CreateProjectRequest, CreateTaskRequest, PaginationConfig, RegisterUserRequest,
    UpdateProjectRequest, UpdateTaskRequest,
};

use crate::tracker::{
    domain::{
        Action, Comment, CommentId, Project, ProjectId, Resource, Task, TaskId, User, UserId,
        UserNames, authorize,
    },
    ports::{ChangeSet, PageRequest, RecordKind, TrackerStore},
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Orchestrates tracker reads and mutations over a [`TrackerStore`].
#[derive(Clone)]
pub struct TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    pagination: PaginationConfig,
}

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Creates a service with default page sizes.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_pagination(store, clock, PaginationConfig::default())
    }

    /// Creates a service with explicit page sizes.
    #[must_use]
    pub const fn with_pagination(
        store: Arc<S>,
        clock: Arc<C>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            store,
            clock,
            pagination,
        }
    }

    /// Returns the page sizes in effect.
    #[must_use]
    pub const fn pagination(&self) -> PaginationConfig {
        self.pagination
    }

    fn page_request(&self, requested: Option<PageRequest>, default_size: u32) -> PageRequest {
        requested
            .unwrap_or_else(|| PageRequest::new(1, default_size))
            .capped_at(self.pagination.max_page_size)
    }

    fn check(&self, actor: UserId, resource: Resource<'_>, action: Action) -> TrackerResult<()> {
        authorize(actor, resource, action).map_err(|denied| {
            tracing::warn!(
                actor = %actor,
                kind = %denied.kind,
                action = %denied.action,
                "access denied"
            );
            TrackerError::from(denied)
        })
    }

    async fn require_user(&self, id: UserId) -> TrackerResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| TrackerError::not_found(RecordKind::User, id))
    }

    async fn require_project(&self, id: ProjectId) -> TrackerResult<Project> {
        self.store
            .find_project(id)
            .await?
            .ok_or_else(|| TrackerError::not_found(RecordKind::Project, id))
    }

    async fn require_task(&self, id: TaskId) -> TrackerResult<(Task, Project)> {
        let task = self
            .store
            .find_task(id)
            .await?
            .ok_or_else(|| TrackerError::not_found(RecordKind::Task, id))?;
        let project = self.require_project(task.project_id()).await?;
        Ok((task, project))
    }

    async fn require_comment(&self, id: CommentId) -> TrackerResult<(Comment, Task, Project)> {
        let comment = self
            .store
            .find_comment(id)
            .await?
            .ok_or_else(|| TrackerError::not_found(RecordKind::Comment, id))?;
        let (task, project) = self.require_task(comment.task_id()).await?;
        Ok((comment, task, project))
    }

    /// Resolves display names for users mentioned in activity details.
    ///
    /// Unknown users are skipped; the recorder renders them by identifier.
    async fn user_names(
        &self,
        users: impl IntoIterator<Item = UserId>,
    ) -> TrackerResult<UserNames> {
        let wanted: BTreeSet<UserId> = users.into_iter().collect();
        let mut names = UserNames::new();
        for id in wanted {
            if let Some(user) = self.store.find_user(id).await? {
                names.insert(&user);
            }
        }
        Ok(names)
    }

    async fn commit(&self, changes: ChangeSet) -> TrackerResult<()> {
        let entries = changes.activities().len();
        self.store.commit(changes).await?;
        tracing::trace!(entries, "change set committed");
        Ok(())
    }
}
