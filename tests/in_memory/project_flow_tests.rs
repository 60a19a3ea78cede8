//! In-memory integration tests for projects, teams and the activity log.

use super::helpers::{TestService, activity_labels, project_with_team, register, service};
use eyre::ensure;
use rstest::rstest;
use taskmaster::tracker::{
    ports::{PageRequest, ProjectQuery, TaskQuery},
    services::{CreateTaskRequest, FailureKind, TrackerError, UpdateProjectRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_listing_is_scoped_to_membership(service: TestService) -> eyre::Result<()> {
    let alice = register(&service, "alice").await?;
    let bob = register(&service, "bob").await?;
    project_with_team(&service, &alice, "Marketing site", &[]).await?;
    project_with_team(&service, &alice, "Mobile app", &[&bob]).await?;
    project_with_team(&service, &bob, "Bob's garden", &[]).await?;

    let alice_projects = service
        .list_projects(alice.id(), ProjectQuery::new(), None)
        .await?;
    ensure!(alice_projects.count() == 2, "alice belongs to two projects");

    let bob_search = service
        .list_projects(bob.id(), ProjectQuery::new().with_search("APP"), None)
        .await?;
    ensure!(bob_search.count() == 1, "search should be case-insensitive");
    ensure!(
        bob_search
            .items()
            .first()
            .is_some_and(|project| project.name().as_str() == "Mobile app"),
        "unexpected match: {:?}",
        bob_search.items()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_creator_manages_the_project(service: TestService) -> eyre::Result<()> {
    let alice = register(&service, "alice").await?;
    let bob = register(&service, "bob").await?;
    let carol = register(&service, "carol").await?;
    let project = project_with_team(&service, &alice, "Website", &[&bob]).await?;

    let rename = service
        .update_project(
            bob.id(),
            project.id(),
            UpdateProjectRequest::new().with_name("Hijacked"),
        )
        .await;
    ensure!(
        matches!(rename, Err(TrackerError::Forbidden(_))),
        "member may not rename: {rename:?}"
    );
    let invite = service.add_member(bob.id(), project.id(), carol.id()).await;
    ensure!(
        invite.as_ref().err().map(TrackerError::kind) == Some(FailureKind::Forbidden),
        "member may not invite: {invite:?}"
    );

    let renamed = service
        .update_project(
            alice.id(),
            project.id(),
            UpdateProjectRequest::new().with_name("Website v2"),
        )
        .await?;
    ensure!(renamed.name().as_str() == "Website v2", "creator may rename");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_keeps_its_history(service: TestService) -> eyre::Result<()> {
    let alice = register(&service, "alice").await?;
    let project = project_with_team(&service, &alice, "Website", &[]).await?;
    let task = service
        .create_task(alice.id(), project.id(), CreateTaskRequest::new("Draft copy"))
        .await?;
    service.add_comment(alice.id(), task.id(), "First pass").await?;

    service.delete_project(alice.id(), project.id()).await?;

    let lookup = service.get_task(alice.id(), task.id()).await;
    ensure!(
        lookup.as_ref().err().map(TrackerError::kind) == Some(FailureKind::NotFound),
        "task should be deleted with the project: {lookup:?}"
    );
    let remaining = service
        .list_tasks(alice.id(), TaskQuery::new(), None)
        .await?;
    ensure!(remaining.count() == 0, "no tasks should remain");
    let relisted = service
        .list_projects(alice.id(), ProjectQuery::new(), None)
        .await?;
    ensure!(relisted.count() == 0, "project should be gone");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn activity_log_pages_newest_first(service: TestService) -> eyre::Result<()> {
    let alice = register(&service, "alice").await?;
    let bob = register(&service, "bob").await?;
    let project = project_with_team(&service, &alice, "Website", &[&bob]).await?;
    for title in ["One", "Two", "Three"] {
        service
            .create_task(alice.id(), project.id(), CreateTaskRequest::new(title))
            .await?;
    }

    let labels = activity_labels(&service, &bob, &project).await?;
    ensure!(
        labels
            == vec![
                "created task",
                "created task",
                "created task",
                "added team member",
                "created project"
            ],
        "unexpected log: {labels:?}"
    );

    let second = service
        .list_activities(bob.id(), project.id(), Some(PageRequest::new(2, 2)))
        .await?;
    ensure!(second.total_pages() == 3, "five entries over pages of two");
    ensure!(second.has_previous() && second.has_next(), "middle page");
    ensure!(
        second
            .items()
            .first()
            .is_some_and(|entry| entry.details().contains("'One'")),
        "oldest task entry should open page two: {:?}",
        second.items()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_read_the_log(service: TestService) -> eyre::Result<()> {
    let alice = register(&service, "alice").await?;
    let mallory = register(&service, "mallory").await?;
    let project = project_with_team(&service, &alice, "Website", &[]).await?;

    let result = service
        .list_activities(mallory.id(), project.id(), None)
        .await;

    ensure!(
        result.as_ref().err().map(TrackerError::kind) == Some(FailureKind::Forbidden),
        "unexpected result: {result:?}"
    );
    Ok(())
}
