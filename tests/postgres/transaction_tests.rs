//! Change sets commit atomically and deletes cascade.

use super::helpers::{prepare, project, task, user};
use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskmaster::tracker::{
    domain::{Activity, ActivityAction, Comment, CommentText, TaskId},
    ports::{Change, ChangeSet, PageRequest, RecordKind, TrackerStore, TrackerStoreError},
};

#[rstest]
fn failing_change_set_leaves_no_trace(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "rollback");
    let owner = user("owner", &ctx.clock);
    let board = project("Board", &owner, &ctx.clock);
    ctx.runtime
        .block_on(
            ctx.store.commit(
                ChangeSet::new()
                    .with(Change::InsertUser(owner.clone()))
                    .with(Change::InsertProject(board.clone())),
            ),
        )
        .expect("setup commit");
    let card = task("Card", &board, &owner, &ctx.clock);
    let unknown = TaskId::new();
    let mut changes = ChangeSet::new()
        .with(Change::InsertTask(card.clone()))
        .with(Change::DeleteTask(unknown));
    changes.record([Activity::new(
        board.id(),
        owner.id(),
        ActivityAction::CreatedTask,
        "created task Card",
        ctx.clock.utc(),
    )]);

    let result = ctx.runtime.block_on(ctx.store.commit(changes));

    match result {
        Err(TrackerStoreError::NotFound { kind, id }) => {
            assert_eq!(kind, RecordKind::Task);
            assert_eq!(id, unknown.into_inner());
        }
        other => panic!("expected missing task, got {other:?}"),
    }
    let stored = ctx
        .runtime
        .block_on(ctx.store.find_task(card.id()))
        .expect("task lookup");
    assert!(stored.is_none(), "inserted task must be rolled back");
    let log = ctx
        .runtime
        .block_on(ctx.store.list_activities(board.id(), PageRequest::new(1, 10)))
        .expect("activity listing");
    assert_eq!(log.count(), 0, "activity must be rolled back");
}

#[rstest]
fn deleting_a_project_removes_its_tasks_and_comments(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "cascade");
    let owner = user("owner", &ctx.clock);
    let board = project("Board", &owner, &ctx.clock);
    let card = task("Card", &board, &owner, &ctx.clock);
    let note = Comment::new(
        card.id(),
        owner.id(),
        CommentText::new("First").expect("valid comment"),
        &ctx.clock,
    );
    let mut setup = ChangeSet::new()
        .with(Change::InsertUser(owner.clone()))
        .with(Change::InsertProject(board.clone()))
        .with(Change::InsertTask(card.clone()))
        .with(Change::InsertComment(note.clone()));
    setup.record([Activity::new(
        board.id(),
        owner.id(),
        ActivityAction::CreatedProject,
        "created project Board",
        ctx.clock.utc(),
    )]);
    ctx.runtime
        .block_on(ctx.store.commit(setup))
        .expect("setup commit");

    ctx.runtime
        .block_on(ctx.store.commit(ChangeSet::new().with(Change::DeleteProject(board.id()))))
        .expect("project delete");

    let remaining_task = ctx
        .runtime
        .block_on(ctx.store.find_task(card.id()))
        .expect("task lookup");
    assert!(remaining_task.is_none());
    let remaining_comment = ctx
        .runtime
        .block_on(ctx.store.find_comment(note.id()))
        .expect("comment lookup");
    assert!(remaining_comment.is_none());
    let log = ctx
        .runtime
        .block_on(ctx.store.list_activities(board.id(), PageRequest::new(1, 10)))
        .expect("activity listing");
    assert_eq!(log.count(), 1, "activity outlives the project");
}

#[rstest]
fn deleting_an_unknown_project_is_not_found(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "missing_project");
    let owner = user("owner", &ctx.clock);
    let board = project("Board", &owner, &ctx.clock);

    let result = ctx
        .runtime
        .block_on(ctx.store.commit(ChangeSet::new().with(Change::DeleteProject(board.id()))));

    assert!(matches!(
        result,
        Err(TrackerStoreError::NotFound { kind: RecordKind::Project, .. })
    ));
}
