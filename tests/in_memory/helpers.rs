//! Shared test helpers for in-memory tracker integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskmaster::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::{Project, User},
    services::{CreateProjectRequest, RegisterUserRequest, TrackerService},
};

/// Service type used by the integration tests.
pub type TestService = TrackerService<InMemoryTrackerStore, DefaultClock>;

/// Provides a service over a fresh in-memory store.
#[fixture]
pub fn service() -> TestService {
    TrackerService::new(Arc::new(InMemoryTrackerStore::new()), Arc::new(DefaultClock))
}

/// Registers `handle` with a derived email address.
///
/// # Errors
///
/// Returns an error if registration fails.
pub async fn register(service: &TestService, handle: &str) -> eyre::Result<User> {
    Ok(service
        .register_user(RegisterUserRequest::new(handle, format!("{handle}@example.com")))
        .await?)
}

/// Creates a project owned by `owner` and adds `members` to its team.
///
/// # Errors
///
/// Returns an error if project creation or any membership change fails.
pub async fn project_with_team(
    service: &TestService,
    owner: &User,
    name: &str,
    members: &[&User],
) -> eyre::Result<Project> {
    let mut project = service
        .create_project(owner.id(), CreateProjectRequest::new(name))
        .await?;
    for member in members {
        project = service
            .add_member(owner.id(), project.id(), member.id())
            .await?;
    }
    Ok(project)
}

/// Returns the activity labels of `project`, newest first.
///
/// # Errors
///
/// Returns an error if `viewer` may not read the project log.
pub async fn activity_labels(
    service: &TestService,
    viewer: &User,
    project: &Project,
) -> eyre::Result<Vec<&'static str>> {
    let log = service
        .list_activities(viewer.id(), project.id(), None)
        .await?;
    Ok(log
        .items()
        .iter()
        .map(|entry| entry.action().label())
        .collect())
}
