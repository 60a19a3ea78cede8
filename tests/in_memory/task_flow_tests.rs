//! In-memory integration tests for the task lifecycle.

use super::helpers::{TestService, activity_labels, project_with_team, register, service};
use eyre::ensure;
use rstest::rstest;
use taskmaster::tracker::{
    domain::{TaskPriority, TaskStatus},
    ports::TaskQuery,
    services::{CreateTaskRequest, FailureKind, TrackerError, UpdateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_walks_the_full_lifecycle(service: TestService) -> eyre::Result<()> {
    let alice = register(&service, "alice").await?;
    let project = project_with_team(&service, &alice, "Website", &[]).await?;
    let task = service
        .create_task(alice.id(), project.id(), CreateTaskRequest::new("Launch"))
        .await?;

    for target in [
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Done,
        TaskStatus::InProgress,
    ] {
        let moved = service.change_status(alice.id(), task.id(), target).await?;
        ensure!(moved.status() == target, "expected {target}");
    }

    let labels = activity_labels(&service, &alice, &project).await?;
    let status_changes = labels
        .iter()
        .filter(|label| **label == "changed task status")
        .count();
    ensure!(status_changes == 4, "one entry per move: {labels:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_may_move_but_bystander_may_not(service: TestService) -> eyre::Result<()> {
    let alice = register(&service, "alice").await?;
    let bob = register(&service, "bob").await?;
    let carol = register(&service, "carol").await?;
    let project = project_with_team(&service, &alice, "Website", &[&bob, &carol]).await?;
    let task = service
        .create_task(
            alice.id(),
            project.id(),
            CreateTaskRequest::new("Launch").assigned_to(bob.id()),
        )
        .await?;

    let by_carol = service
        .change_status(carol.id(), task.id(), TaskStatus::InProgress)
        .await;
    ensure!(
        by_carol.as_ref().err().map(TrackerError::kind) == Some(FailureKind::Forbidden),
        "bystander move should be forbidden: {by_carol:?}"
    );

    let by_bob = service
        .change_status(bob.id(), task.id(), TaskStatus::InProgress)
        .await?;
    ensure!(by_bob.status() == TaskStatus::InProgress, "assignee may move");

    let comment = service.add_comment(carol.id(), task.id(), "Need help?").await?;
    ensure!(comment.author() == carol.id(), "any member may comment");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unassigning_is_recorded_once(service: TestService) -> eyre::Result<()> {
    let alice = register(&service, "alice").await?;
    let bob = register(&service, "bob").await?;
    let project = project_with_team(&service, &alice, "Website", &[&bob]).await?;
    let task = service
        .create_task(alice.id(), project.id(), CreateTaskRequest::new("Launch"))
        .await?;

    service.assign(alice.id(), task.id(), bob.id()).await?;
    service.assign(alice.id(), task.id(), bob.id()).await?;
    service
        .update_task(
            bob.id(),
            task.id(),
            UpdateTaskRequest::new().with_assignee(None),
        )
        .await?;
    service.unassign(alice.id(), task.id()).await?;

    let labels = activity_labels(&service, &alice, &project).await?;
    let newest: Vec<&str> = labels.iter().take(2).copied().collect();
    ensure!(
        newest == vec!["unassigned task", "assigned task"],
        "repeated calls must not be logged: {labels:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_listing_applies_filters(service: TestService) -> eyre::Result<()> {
    let alice = register(&service, "alice").await?;
    let bob = register(&service, "bob").await?;
    let project = project_with_team(&service, &alice, "Website", &[&bob]).await?;
    let urgent = service
        .create_task(
            alice.id(),
            project.id(),
            CreateTaskRequest::new("Fix checkout bug")
                .with_priority(TaskPriority::Urgent)
                .assigned_to(bob.id()),
        )
        .await?;
    service
        .create_task(
            alice.id(),
            project.id(),
            CreateTaskRequest::new("Write blog post").with_description("About the checkout"),
        )
        .await?;

    let by_priority = service
        .list_tasks(
            bob.id(),
            TaskQuery::new().with_priorities([TaskPriority::Urgent, TaskPriority::High]),
            None,
        )
        .await?;
    ensure!(
        by_priority.into_items() == vec![urgent],
        "only the urgent task should match"
    );

    let by_text = service
        .list_tasks(bob.id(), TaskQuery::new().with_search("checkout"), None)
        .await?;
    ensure!(by_text.count() == 2, "search covers title and description");

    let mine = service
        .list_tasks(
            bob.id(),
            TaskQuery::new()
                .assigned_to(bob.id())
                .with_statuses([TaskStatus::Todo]),
            None,
        )
        .await?;
    ensure!(mine.count() == 1, "bob has one open task");
    Ok(())
}
