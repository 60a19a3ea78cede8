//! Project operations and team membership.

use super::{CreateProjectRequest, TrackerResult, TrackerService, UpdateProjectRequest};
use crate::tracker::{
    domain::{
        Action, ActivityRecorder, EntityChange, Project, ProjectId, ProjectName, Resource,
        Snapshot, UserId, UserNames,
    },
    ports::{Change, ChangeSet, Page, PageRequest, ProjectQuery, TrackerStore},
};
use mockable::Clock;

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Creates a project owned by `actor`, who becomes its first member.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when `actor` is not a
    /// registered user and [`super::TrackerError::Validation`] for an invalid
    /// name.
    pub async fn create_project(
        &self,
        actor: UserId,
        request: CreateProjectRequest,
    ) -> TrackerResult<Project> {
        let creator = self.require_user(actor).await?;
        let name = ProjectName::new(request.name)?;
        let project = Project::new(name, request.description, actor, &*self.clock);

        let names: UserNames = [&creator].into_iter().collect();
        let recorder = ActivityRecorder::new(actor, &names, &*self.clock);
        let mut changes = ChangeSet::new().with(Change::InsertProject(project.clone()));
        changes.record(recorder.record(EntityChange::Created(Snapshot::Project(&project))));
        self.commit(changes).await?;

        tracing::info!(project_id = %project.id(), actor = %actor, "created project");
        Ok(project)
    }

    /// Returns a project the actor belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] for an unknown project and
    /// [`super::TrackerError::Forbidden`] when `actor` is not a member.
    pub async fn get_project(&self, actor: UserId, id: ProjectId) -> TrackerResult<Project> {
        tracing::debug!(project_id = %id, actor = %actor, "getting project");
        let project = self.require_project(id).await?;
        self.check(actor, Resource::Project(&project), Action::Read)?;
        Ok(project)
    }

    /// Lists projects matching `query` among those `actor` belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Store`] when the listing fails.
    pub async fn list_projects(
        &self,
        actor: UserId,
        query: ProjectQuery,
        page: Option<PageRequest>,
    ) -> TrackerResult<Page<Project>> {
        let request = self.page_request(page, self.pagination.default_page_size);
        tracing::debug!(actor = %actor, page = request.page(), "listing projects");
        let scoped = query.visible_to(actor);
        Ok(self.store.list_projects(&scoped, request).await?)
    }

    /// Renames a project or replaces its description. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is not the
    /// creator and [`super::TrackerError::Validation`] for an invalid name.
    pub async fn update_project(
        &self,
        actor: UserId,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> TrackerResult<Project> {
        let mut project = self.require_project(id).await?;
        self.check(actor, Resource::Project(&project), Action::Update)?;

        if request.name.is_none() && request.description.is_none() {
            return Ok(project);
        }
        if let Some(name) = request.name {
            project.rename(ProjectName::new(name)?, &*self.clock);
        }
        if let Some(description) = request.description {
            project.set_description(description, &*self.clock);
        }

        self.commit(ChangeSet::new().with(Change::UpdateProject(project.clone())))
            .await?;
        tracing::info!(project_id = %id, actor = %actor, "updated project");
        Ok(project)
    }

    /// Deletes a project with its tasks and comments. Creator only.
    ///
    /// The project's activity entries are kept.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is not the
    /// creator.
    pub async fn delete_project(&self, actor: UserId, id: ProjectId) -> TrackerResult<()> {
        let project = self.require_project(id).await?;
        self.check(actor, Resource::Project(&project), Action::Delete)?;

        let names = self.user_names([actor]).await?;
        let recorder = ActivityRecorder::new(actor, &names, &*self.clock);
        let mut changes = ChangeSet::new().with(Change::DeleteProject(id));
        changes.record(recorder.record(EntityChange::Deleted(Snapshot::Project(&project))));
        self.commit(changes).await?;

        tracing::info!(project_id = %id, actor = %actor, "deleted project");
        Ok(())
    }

    /// Adds `user` to the project team. Creator only.
    ///
    /// Adding an existing member is a no-op that records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is not the
    /// creator and [`super::TrackerError::NotFound`] when `user` is not
    /// registered.
    pub async fn add_member(
        &self,
        actor: UserId,
        project_id: ProjectId,
        user: UserId,
    ) -> TrackerResult<Project> {
        let mut project = self.require_project(project_id).await?;
        self.check(actor, Resource::Project(&project), Action::AddMember)?;
        self.require_user(user).await?;

        let before = project.clone();
        if !project.add_member(user, &*self.clock) {
            return Ok(project);
        }

        let names = self.user_names([actor, user]).await?;
        let recorder = ActivityRecorder::new(actor, &names, &*self.clock);
        let mut changes = ChangeSet::new().with(Change::UpdateProject(project.clone()));
        changes.record(recorder.record(EntityChange::Updated {
            before: Snapshot::Project(&before),
            after: Snapshot::Project(&project),
        }));
        self.commit(changes).await?;

        tracing::info!(project_id = %project_id, actor = %actor, member = %user, "added team member");
        Ok(project)
    }

    /// Removes `user` from the project team. Creator only.
    ///
    /// Tasks of the project assigned to `user` are unassigned in the same
    /// commit. Removing a non-member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Forbidden`] when `actor` is not the
    /// creator, [`super::TrackerError::InvalidOperation`] when `user` is
    /// the creator, and [`super::TrackerError::Validation`] when a task was
    /// assigned to `user` while the removal was in flight.
    pub async fn remove_member(
        &self,
        actor: UserId,
        project_id: ProjectId,
        user: UserId,
    ) -> TrackerResult<Project> {
        let mut project = self.require_project(project_id).await?;
        self.check(actor, Resource::Project(&project), Action::RemoveMember)?;

        let before = project.clone();
        if !project.remove_member(user, &*self.clock)? {
            return Ok(project);
        }

        let names = self.user_names([actor, user]).await?;
        let recorder = ActivityRecorder::new(actor, &names, &*self.clock);
        let mut changes = ChangeSet::new();
        changes.record(recorder.record(EntityChange::Updated {
            before: Snapshot::Project(&before),
            after: Snapshot::Project(&project),
        }));

        // Unassignments precede the team update. A task assigned to `user`
        // after this read fails the commit with `AssigneeNotMember`.
        let assigned = self.store.find_assigned_tasks(project_id, user).await?;
        let orphaned = assigned.len();
        for mut task in assigned {
            let previous = task.clone();
            if task.unassign(&*self.clock) {
                changes.record(recorder.record(EntityChange::Updated {
                    before: Snapshot::Task(&previous),
                    after: Snapshot::Task(&task),
                }));
                changes.push(Change::UpdateTask(task));
            }
        }
        changes.push(Change::UpdateProject(project.clone()));
        self.commit(changes).await?;

        tracing::info!(
            project_id = %project_id,
            actor = %actor,
            member = %user,
            unassigned = orphaned,
            "removed team member"
        );
        Ok(project)
    }
}
