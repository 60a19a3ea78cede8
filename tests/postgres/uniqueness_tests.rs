//! Key and reference violations mapped to store errors.

use super::helpers::{prepare, project, task, user};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskmaster::tracker::{
    domain::{EmailAddress, User, UserId, Username},
    ports::{Change, ChangeSet, RecordKind, TrackerStore, TrackerStoreError},
};

#[rstest]
fn taken_username_is_reported_by_handle(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "dup_username");
    let first = user("alice", &ctx.clock);
    let second = User::new(
        Username::new("alice").expect("valid username"),
        EmailAddress::new("other@example.com").expect("valid email"),
        "",
        "",
        &ctx.clock,
    );
    ctx.runtime
        .block_on(ctx.store.commit(ChangeSet::new().with(Change::InsertUser(first))))
        .expect("first registration");

    let result = ctx
        .runtime
        .block_on(ctx.store.commit(ChangeSet::new().with(Change::InsertUser(second.clone()))));

    match result {
        Err(TrackerStoreError::DuplicateUsername(handle)) => {
            assert_eq!(handle.as_str(), "alice");
        }
        other => panic!("expected DuplicateUsername, got {other:?}"),
    }
    let stored = ctx
        .runtime
        .block_on(ctx.store.find_user(second.id()))
        .expect("user lookup");
    assert!(stored.is_none());
}

#[rstest]
fn repeated_task_id_is_a_duplicate(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "dup_task");
    let owner = user("owner", &ctx.clock);
    let board = project("Board", &owner, &ctx.clock);
    let card = task("Card", &board, &owner, &ctx.clock);
    ctx.runtime
        .block_on(
            ctx.store.commit(
                ChangeSet::new()
                    .with(Change::InsertUser(owner))
                    .with(Change::InsertProject(board))
                    .with(Change::InsertTask(card.clone())),
            ),
        )
        .expect("commit");

    let result = ctx
        .runtime
        .block_on(ctx.store.commit(ChangeSet::new().with(Change::InsertTask(card.clone()))));

    match result {
        Err(TrackerStoreError::Duplicate { kind, id }) => {
            assert_eq!(kind, RecordKind::Task);
            assert_eq!(id, card.id().into_inner());
        }
        other => panic!("expected Duplicate, got {other:?}"),
    }
}

#[rstest]
fn task_in_missing_project_reports_the_project(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "orphan_task");
    let owner = user("owner", &ctx.clock);
    let board = project("Board", &owner, &ctx.clock);
    let orphan = task("Orphan", &board, &owner, &ctx.clock);

    let result = ctx.runtime.block_on(
        ctx.store.commit(
            ChangeSet::new()
                .with(Change::InsertUser(owner))
                .with(Change::InsertTask(orphan)),
        ),
    );

    match result {
        Err(TrackerStoreError::NotFound { kind, id }) => {
            assert_eq!(kind, RecordKind::Project);
            assert_eq!(id, board.id().into_inner());
        }
        other => panic!("expected missing project, got {other:?}"),
    }
}

#[rstest]
fn unknown_team_member_is_named(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "ghost_member");
    let owner = user("owner", &ctx.clock);
    let ghost = UserId::new();
    let mut board = project("Board", &owner, &ctx.clock);
    board.add_member(ghost, &ctx.clock);

    let result = ctx.runtime.block_on(
        ctx.store.commit(
            ChangeSet::new()
                .with(Change::InsertUser(owner.clone()))
                .with(Change::InsertProject(board.clone())),
        ),
    );

    match result {
        Err(TrackerStoreError::NotFound { kind, id }) => {
            assert_eq!(kind, RecordKind::User);
            assert_eq!(id, ghost.into_inner());
        }
        other => panic!("expected missing user, got {other:?}"),
    }
    let stored = ctx
        .runtime
        .block_on(ctx.store.find_user(owner.id()))
        .expect("user lookup");
    assert!(stored.is_none(), "failed commit must not keep the owner");
}
