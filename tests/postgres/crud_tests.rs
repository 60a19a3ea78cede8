//! Round trips, listings and filters against `PostgreSQL`.

use super::helpers::{prepare, project, task, user};
use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskmaster::tracker::{
    domain::{Activity, ActivityAction, Comment, CommentText, Task, TaskId, TaskPriority},
    ports::{Change, ChangeSet, PageRequest, ProjectQuery, TaskQuery, TrackerStore},
};

#[rstest]
fn committed_records_round_trip(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "round_trip");
    let owner = user("owner", &ctx.clock);
    let helper = user("helper", &ctx.clock);
    let mut board = project("Board", &owner, &ctx.clock);
    board.add_member(helper.id(), &ctx.clock);
    let card = task("Card", &board, &owner, &ctx.clock);
    let note = Comment::new(
        card.id(),
        helper.id(),
        CommentText::new("On it").expect("valid comment"),
        &ctx.clock,
    );

    ctx.runtime
        .block_on(
            ctx.store.commit(
                ChangeSet::new()
                    .with(Change::InsertUser(owner.clone()))
                    .with(Change::InsertUser(helper.clone()))
                    .with(Change::InsertProject(board.clone()))
                    .with(Change::InsertTask(card.clone()))
                    .with(Change::InsertComment(note.clone())),
            ),
        )
        .expect("commit");

    let found_user = ctx
        .runtime
        .block_on(ctx.store.find_user_by_username(helper.username()))
        .expect("user lookup");
    assert_eq!(found_user, Some(helper));
    let found_project = ctx
        .runtime
        .block_on(ctx.store.find_project(board.id()))
        .expect("project lookup");
    assert_eq!(found_project, Some(board));
    let found_task = ctx
        .runtime
        .block_on(ctx.store.find_task(card.id()))
        .expect("task lookup");
    assert_eq!(found_task, Some(card));
    let found_comment = ctx
        .runtime
        .block_on(ctx.store.find_comment(note.id()))
        .expect("comment lookup");
    assert_eq!(found_comment, Some(note));
}

#[rstest]
fn missing_records_are_none(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "missing");

    let found = ctx
        .runtime
        .block_on(ctx.store.find_task(TaskId::new()))
        .expect("task lookup");

    assert!(found.is_none());
}

#[rstest]
fn task_search_treats_wildcards_literally(shared_test_cluster: &'static TestCluster) {
    let ctx = prepare(shared_test_cluster, "search");
    let owner = user("owner", &ctx.clock);
    let board = project("Board", &owner, &ctx.clock);
    let literal = task("Reach 100% coverage", &board, &owner, &ctx.clock);
    let lookalike = task("Reach 1000 users", &board, &owner, &ctx.clock);
    ctx.runtime
        .block_on(
            ctx.store.commit(
                ChangeSet::new()
                    .with(Change::InsertUser(owner))
                    .with(Change::InsertProject(board))
                    .with(Change::InsertTask(literal.clone()))
                    .with(Change::InsertTask(lookalike)),
            ),
        )
        .expect("commit");

    let hits = ctx
        .runtime
        .block_on(ctx.store.list_tasks(
            &TaskQuery::new().with_search("100%"),
            PageRequest::new(1, 10),
        ))
        .expect("search");

    assert_eq!(hits.into_items(), vec![literal]);
}

#[rstest]
fn listings_filter_by_visibility_and_page_newest_first(
    shared_test_cluster: &'static TestCluster,
) {
    let ctx = prepare(shared_test_cluster, "listings");
    let owner = user("owner", &ctx.clock);
    let outsider = user("outsider", &ctx.clock);
    let board = project("Board", &owner, &ctx.clock);
    let hidden_board = project("Hidden", &outsider, &ctx.clock);
    let older = task("Older", &board, &owner, &ctx.clock);
    let mut newer = task("Newer", &board, &owner, &ctx.clock);
    newer.set_priority(TaskPriority::Urgent, &ctx.clock);
    let hidden = task("Hidden task", &hidden_board, &outsider, &ctx.clock);
    ctx.runtime
        .block_on(
            ctx.store.commit(
                ChangeSet::new()
                    .with(Change::InsertUser(owner.clone()))
                    .with(Change::InsertUser(outsider))
                    .with(Change::InsertProject(board.clone()))
                    .with(Change::InsertProject(hidden_board))
                    .with(Change::InsertTask(older.clone()))
                    .with(Change::InsertTask(newer.clone()))
                    .with(Change::InsertTask(hidden)),
            ),
        )
        .expect("commit");

    let first_page = ctx
        .runtime
        .block_on(ctx.store.list_tasks(
            &TaskQuery::new().visible_to(owner.id()),
            PageRequest::new(1, 1),
        ))
        .expect("task listing");
    assert_eq!(first_page.count(), 2);
    assert_eq!(first_page.total_pages(), 2);
    assert_eq!(first_page.items().iter().map(Task::id).collect::<Vec<_>>(), vec![newer.id()]);

    let urgent = ctx
        .runtime
        .block_on(ctx.store.list_tasks(
            &TaskQuery::new()
                .visible_to(owner.id())
                .with_priorities([TaskPriority::Urgent]),
            PageRequest::new(1, 10),
        ))
        .expect("priority filter");
    assert_eq!(urgent.into_items(), vec![newer]);

    let projects = ctx
        .runtime
        .block_on(ctx.store.list_projects(
            &ProjectQuery::new().visible_to(owner.id()),
            PageRequest::new(1, 10),
        ))
        .expect("project listing");
    assert_eq!(projects.into_items(), vec![board]);
}

#[rstest]
fn activities_with_equal_timestamps_keep_commit_order(
    shared_test_cluster: &'static TestCluster,
) {
    let ctx = prepare(shared_test_cluster, "activity_order");
    let owner = user("owner", &ctx.clock);
    let board = project("Board", &owner, &ctx.clock);
    let at = ctx.clock.utc();
    let entry = |details: &str| {
        Activity::new(board.id(), owner.id(), ActivityAction::ChangedTaskPriority, details, at)
    };
    let mut changes = ChangeSet::new()
        .with(Change::InsertUser(owner.clone()))
        .with(Change::InsertProject(board.clone()));
    changes.record([entry("first"), entry("second"), entry("third")]);
    ctx.runtime
        .block_on(ctx.store.commit(changes))
        .expect("commit");

    let log = ctx
        .runtime
        .block_on(ctx.store.list_activities(board.id(), PageRequest::new(1, 2)))
        .expect("activity listing");

    let details: Vec<&str> = log.items().iter().map(Activity::details).collect();
    assert_eq!(details, vec!["third", "second"]);
    assert!(log.has_next());
}
