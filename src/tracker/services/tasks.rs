//! Task operations: creation, edits, status lifecycle and assignment.

use super::{CreateTaskRequest, TrackerResult, TrackerService, UpdateTaskRequest};
use crate::tracker::{
    domain::{
        Action, ActivityRecorder, EntityChange, Project, ProjectId, Resource, Snapshot, Task,
        TaskDraft, TaskId, TaskStatus, TaskTitle, UserId,
    },
    ports::{Change, ChangeSet, Page, PageRequest, TaskQuery, TrackerStore},
};
use mockable::Clock;

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Creates a task in a project `actor` belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is not a team
    /// member and [`super::TrackerError::Validation`] for an invalid title or
    /// an assignee outside the team.
    pub async fn create_task(
        &self,
        actor: UserId,
        project_id: ProjectId,
        request: CreateTaskRequest,
    ) -> TrackerResult<Task> {
        let project = self.require_project(project_id).await?;
        self.check(actor, Resource::Project(&project), Action::CreateTask)?;

        let draft = TaskDraft {
            description: request.description,
            priority: request.priority,
            due_date: request.due_date,
            assigned_to: request.assigned_to,
            ..TaskDraft::new(TaskTitle::new(request.title)?)
        };
        let task = Task::new(draft, &project, actor, &*self.clock)?;

        let names = self.user_names([actor]).await?;
        let recorder = ActivityRecorder::new(actor, &names, &*self.clock);
        let mut changes = ChangeSet::new().with(Change::InsertTask(task.clone()));
        changes.record(recorder.record(EntityChange::Created(Snapshot::Task(&task))));
        self.commit(changes).await?;

        tracing::info!(task_id = %task.id(), project_id = %project_id, actor = %actor, "created task");
        Ok(task)
    }

    /// Returns a task visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] for an unknown task and
    /// [`super::TrackerError::Forbidden`] when `actor` is not a member of its
    /// project.
    pub async fn get_task(&self, actor: UserId, id: TaskId) -> TrackerResult<Task> {
        tracing::debug!(task_id = %id, actor = %actor, "getting task");
        let (task, project) = self.require_task(id).await?;
        self.check(
            actor,
            Resource::Task {
                task: &task,
                project: &project,
            },
            Action::Read,
        )?;
        Ok(task)
    }

    /// Lists tasks matching `query` across the projects `actor` belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Store`] when the listing fails.
    pub async fn list_tasks(
        &self,
        actor: UserId,
        query: TaskQuery,
        page: Option<PageRequest>,
    ) -> TrackerResult<Page<Task>> {
        let request = self.page_request(page, self.pagination.default_page_size);
        tracing::debug!(actor = %actor, page = request.page(), "listing tasks");
        let scoped = query.visible_to(actor);
        Ok(self.store.list_tasks(&scoped, request).await?)
    }

    /// Applies a partial update to a task.
    ///
    /// Status changes follow the transition table, and assignee changes
    /// require the assignee to be a team member. All requested changes are
    /// validated before anything is committed.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is neither the
    /// task creator, its assignee nor the project creator,
    /// [`super::TrackerError::InvalidTransition`] for a disallowed status
    /// edge, and [`super::TrackerError::Validation`] for invalid field values.
    pub async fn update_task(
        &self,
        actor: UserId,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TrackerResult<Task> {
        let (mut task, project) = self.require_task(id).await?;
        self.authorize_task(actor, &task, &project, Action::Update)?;
        if request.is_empty() {
            return Ok(task);
        }

        let before = task.clone();
        if let Some(title) = request.title {
            task.retitle(TaskTitle::new(title)?, &*self.clock);
        }
        if let Some(description) = request.description {
            task.set_description(description, &*self.clock);
        }
        if let Some(target) = request.status.filter(|status| *status != before.status()) {
            task.transition_to(target, &*self.clock)?;
        }
        if let Some(priority) = request.priority.filter(|level| *level != before.priority()) {
            task.set_priority(priority, &*self.clock);
        }
        match request.assigned_to {
            Some(Some(assignee)) => task.assign(&project, assignee, &*self.clock)?,
            Some(None) => {
                task.unassign(&*self.clock);
            }
            None => {}
        }
        if let Some(due_date) = request.due_date {
            task.set_due_date(due_date, &*self.clock);
        }

        self.record_task_update(actor, &before, &task).await?;
        tracing::info!(task_id = %id, actor = %actor, "updated task");
        Ok(task)
    }

    /// Moves a task along its status lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` may not change
    /// the task and [`super::TrackerError::InvalidTransition`] when the edge is
    /// not allowed, including a move to the current status.
    pub async fn change_status(
        &self,
        actor: UserId,
        id: TaskId,
        target: TaskStatus,
    ) -> TrackerResult<Task> {
        let (mut task, project) = self.require_task(id).await?;
        self.authorize_task(actor, &task, &project, Action::ChangeStatus)?;

        let before = task.clone();
        task.transition_to(target, &*self.clock)?;

        self.record_task_update(actor, &before, &task).await?;
        tracing::info!(
            task_id = %id,
            actor = %actor,
            from = %before.status(),
            to = %target,
            "changed task status"
        );
        Ok(task)
    }

    /// Assigns a task to a member of its project.
    ///
    /// Reassigning the current assignee is a no-op that records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` may not assign
    /// the task and [`super::TrackerError::Validation`] when `assignee` is not
    /// a team member.
    pub async fn assign(&self, actor: UserId, id: TaskId, assignee: UserId) -> TrackerResult<Task> {
        let (mut task, project) = self.require_task(id).await?;
        self.authorize_task(actor, &task, &project, Action::Assign)?;

        let before = task.clone();
        task.assign(&project, assignee, &*self.clock)?;
        if task.assigned_to() == before.assigned_to() {
            return Ok(task);
        }

        self.record_task_update(actor, &before, &task).await?;
        tracing::info!(task_id = %id, actor = %actor, assignee = %assignee, "assigned task");
        Ok(task)
    }

    /// Clears the assignee of a task.
    ///
    /// Unassigning an unassigned task is a no-op that records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` may not
    /// unassign the task.
    pub async fn unassign(&self, actor: UserId, id: TaskId) -> TrackerResult<Task> {
        let (mut task, project) = self.require_task(id).await?;
        self.authorize_task(actor, &task, &project, Action::Unassign)?;

        let before = task.clone();
        if !task.unassign(&*self.clock) {
            return Ok(task);
        }

        self.record_task_update(actor, &before, &task).await?;
        tracing::info!(task_id = %id, actor = %actor, "unassigned task");
        Ok(task)
    }

    /// Deletes a task and its comments.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is neither the
    /// task creator, its assignee nor the project creator.
    pub async fn delete_task(&self, actor: UserId, id: TaskId) -> TrackerResult<()> {
        let (task, project) = self.require_task(id).await?;
        self.authorize_task(actor, &task, &project, Action::Delete)?;

        let names = self.user_names([actor]).await?;
        let recorder = ActivityRecorder::new(actor, &names, &*self.clock);
        let mut changes = ChangeSet::new().with(Change::DeleteTask(id));
        changes.record(recorder.record(EntityChange::Deleted(Snapshot::Task(&task))));
        self.commit(changes).await?;

        tracing::info!(task_id = %id, project_id = %project.id(), actor = %actor, "deleted task");
        Ok(())
    }

    fn authorize_task(
        &self,
        actor: UserId,
        task: &Task,
        project: &Project,
        action: Action,
    ) -> TrackerResult<()> {
        self.check(actor, Resource::Task { task, project }, action)
    }

    async fn record_task_update(
        &self,
        actor: UserId,
        before: &Task,
        after: &Task,
    ) -> TrackerResult<()> {
        let mentioned = [Some(actor), before.assigned_to(), after.assigned_to()];
        let names = self.user_names(mentioned.into_iter().flatten()).await?;
        let recorder = ActivityRecorder::new(actor, &names, &*self.clock);
        let mut changes = ChangeSet::new().with(Change::UpdateTask(after.clone()));
        changes.record(recorder.record(EntityChange::Updated {
            before: Snapshot::Task(before),
            after: Snapshot::Task(after),
        }));
        self.commit(changes).await
    }
}
