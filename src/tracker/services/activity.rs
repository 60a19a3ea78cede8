//! Project activity feed.

use super::{TrackerResult, TrackerService};
use crate::tracker::{
    domain::{Action, Activity, ProjectId, Resource, UserId},
    ports::{Page, PageRequest, TrackerStore},
};
use mockable::Clock;

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Lists a project's activity entries, newest first. Members only.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] for an unknown project and
    /// [`super::TrackerError::Forbidden`] when `actor` is not a member.
    pub async fn list_activities(
        &self,
        actor: UserId,
        project_id: ProjectId,
        page: Option<PageRequest>,
    ) -> TrackerResult<Page<Activity>> {
        let project = self.require_project(project_id).await?;
        self.check(actor, Resource::Project(&project), Action::Read)?;
        let request = self.page_request(page, self.pagination.large_page_size);
        tracing::debug!(project_id = %project_id, actor = %actor, page = request.page(), "listing activity");
        Ok(self.store.list_activities(project_id, request).await?)
    }
}
