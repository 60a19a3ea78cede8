//! Then steps for task status transition BDD scenarios.

use super::world::{MoveOutcome, StatusTransitionWorld, run_async};
use rstest_bdd_macros::then;
use taskmaster::tracker::{domain::TaskStatus, services::TrackerError};

fn last_move(world: &StatusTransitionWorld) -> Result<&MoveOutcome, eyre::Report> {
    world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move outcome"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &StatusTransitionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let owner = world.owner()?.id();
    let task_id = world.task()?.id();

    let stored = run_async(world.service.get_task(owner, task_id))?;
    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            stored.status().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the activity log has {count:u64} "{label}" entries"#)]
fn activity_log_has(
    world: &StatusTransitionWorld,
    count: u64,
    label: String,
) -> Result<(), eyre::Report> {
    let owner = world.owner()?.id();
    let project_id = world.project()?.id();

    let log = run_async(world.service.list_activities(owner, project_id, None))?;
    let found = log
        .items()
        .iter()
        .filter(|entry| entry.action().label() == label)
        .count();
    if u64::try_from(found)? != count {
        return Err(eyre::eyre!("expected {count} {label:?} entries, found {found}"));
    }
    Ok(())
}

#[then("the move fails with an invalid transition error")]
fn move_fails_with_invalid_transition(world: &StatusTransitionWorld) -> Result<(), eyre::Report> {
    let outcome = last_move(world)?;
    if !matches!(
        outcome,
        MoveOutcome::Applied(Err(TrackerError::InvalidTransition { .. }))
    ) {
        return Err(eyre::eyre!(
            "expected InvalidTransition error, got {outcome:?}"
        ));
    }
    Ok(())
}

#[then("the move is forbidden")]
fn move_is_forbidden(world: &StatusTransitionWorld) -> Result<(), eyre::Report> {
    let outcome = last_move(world)?;
    if !matches!(outcome, MoveOutcome::Applied(Err(TrackerError::Forbidden(_)))) {
        return Err(eyre::eyre!("expected Forbidden error, got {outcome:?}"));
    }
    Ok(())
}

#[then("the move fails with an unknown status error")]
fn move_fails_with_unknown_status(world: &StatusTransitionWorld) -> Result<(), eyre::Report> {
    let outcome = last_move(world)?;
    if !matches!(outcome, MoveOutcome::UnknownStatus(_)) {
        return Err(eyre::eyre!("expected unknown status error, got {outcome:?}"));
    }
    Ok(())
}
