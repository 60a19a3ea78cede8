//! The assignee reference into the team table.

use std::sync::Arc;

use super::helpers::{TickingClock, prepare, project, task, user};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskmaster::tracker::{
    domain::TrackerDomainError,
    ports::{Change, ChangeSet, TrackerStore, TrackerStoreError},
    services::{
        CreateProjectRequest, CreateTaskRequest, RegisterUserRequest, TrackerError,
        TrackerService,
    },
};

#[rstest]
fn assigning_a_non_member_is_rejected(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "assign_outsider");
    let owner = user("owner", &ctx.clock);
    let helper = user("helper", &ctx.clock);
    let outsider = user("outsider", &ctx.clock);
    let mut board = project("Board", &owner, &ctx.clock);
    board.add_member(helper.id(), &ctx.clock);
    let card = task("Card", &board, &owner, &ctx.clock);
    ctx.runtime
        .block_on(
            ctx.store.commit(
                ChangeSet::new()
                    .with(Change::InsertUser(owner))
                    .with(Change::InsertUser(helper.clone()))
                    .with(Change::InsertUser(outsider.clone()))
                    .with(Change::InsertProject(board.clone()))
                    .with(Change::InsertTask(card.clone())),
            ),
        )
        .expect("setup commit");
    // Assign against a team that momentarily includes the outsider.
    let mut widened = board.clone();
    widened.add_member(outsider.id(), &ctx.clock);
    let mut reassigned = card.clone();
    reassigned
        .assign(&widened, outsider.id(), &ctx.clock)
        .expect("member of the widened team");

    let result = ctx
        .runtime
        .block_on(ctx.store.commit(ChangeSet::new().with(Change::UpdateTask(reassigned))));

    match result {
        Err(TrackerStoreError::AssigneeNotMember { project_id, user_id }) => {
            assert_eq!(project_id, board.id());
            assert_eq!(user_id, outsider.id());
        }
        other => panic!("expected AssigneeNotMember, got {other:?}"),
    }
    let stored = ctx
        .runtime
        .block_on(ctx.store.find_task(card.id()))
        .expect("task lookup");
    assert_eq!(stored, Some(card));
}

#[rstest]
fn team_update_cannot_strand_an_assignee(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "strand_assignee");
    let owner = user("owner", &ctx.clock);
    let helper = user("helper", &ctx.clock);
    let mut board = project("Board", &owner, &ctx.clock);
    board.add_member(helper.id(), &ctx.clock);
    let mut card = task("Card", &board, &owner, &ctx.clock);
    card.assign(&board, helper.id(), &ctx.clock)
        .expect("helper is a member");
    ctx.runtime
        .block_on(
            ctx.store.commit(
                ChangeSet::new()
                    .with(Change::InsertUser(owner))
                    .with(Change::InsertUser(helper.clone()))
                    .with(Change::InsertProject(board.clone()))
                    .with(Change::InsertTask(card)),
            ),
        )
        .expect("setup commit");
    let mut shrunk = board.clone();
    shrunk
        .remove_member(helper.id(), &ctx.clock)
        .expect("helper is not the creator");

    let result = ctx
        .runtime
        .block_on(ctx.store.commit(ChangeSet::new().with(Change::UpdateProject(shrunk))));

    match result {
        Err(TrackerStoreError::AssigneeNotMember { project_id, user_id }) => {
            assert_eq!(project_id, board.id());
            assert_eq!(user_id, helper.id());
        }
        other => panic!("expected AssigneeNotMember, got {other:?}"),
    }
    let stored = ctx
        .runtime
        .block_on(ctx.store.find_project(board.id()))
        .expect("project lookup");
    assert_eq!(stored, Some(board), "team must be unchanged");
}

#[rstest]
fn removing_a_member_unassigns_their_tasks(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "remove_member");
    let service = TrackerService::new(
        Arc::new(ctx.store.clone()),
        Arc::new(TickingClock::default()),
    );

    let (card, board, helper, owner) = ctx.runtime.block_on(async {
        let owner = service
            .register_user(RegisterUserRequest::new("owner", "owner@example.com"))
            .await
            .expect("owner registers");
        let helper = service
            .register_user(RegisterUserRequest::new("helper", "helper@example.com"))
            .await
            .expect("helper registers");
        let created = service
            .create_project(owner.id(), CreateProjectRequest::new("Board"))
            .await
            .expect("project created");
        let board = service
            .add_member(owner.id(), created.id(), helper.id())
            .await
            .expect("helper joins");
        let card = service
            .create_task(owner.id(), board.id(), CreateTaskRequest::new("Card"))
            .await
            .expect("task created");
        service
            .assign(owner.id(), card.id(), helper.id())
            .await
            .expect("helper assigned");
        (card, board, helper, owner)
    });

    let outcome = ctx.runtime.block_on(async {
        let team = service
            .remove_member(owner.id(), board.id(), helper.id())
            .await?;
        let stored = service.get_task(owner.id(), card.id()).await?;
        Ok::<_, TrackerError>((team, stored))
    });

    let (team, stored) = outcome.expect("removal succeeds");
    assert!(!team.is_member(helper.id()));
    assert_eq!(stored.assigned_to(), None);
    let reassign = ctx
        .runtime
        .block_on(service.assign(owner.id(), card.id(), helper.id()));
    assert!(matches!(
        reassign,
        Err(TrackerError::Validation(TrackerDomainError::AssigneeNotMember { .. }))
    ));
}
