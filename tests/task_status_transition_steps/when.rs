//! When steps for task status transition BDD scenarios.

use super::world::{MoveOutcome, StatusTransitionWorld, run_async};
use rstest_bdd_macros::when;
use taskmaster::tracker::domain::TaskStatus;

#[when(r#""{handle}" moves the task to "{status}""#)]
fn move_task(
    world: &mut StatusTransitionWorld,
    handle: String,
    status: String,
) -> Result<(), eyre::Report> {
    let actor = world.user(&handle)?.id();
    let task_id = world.task()?.id();

    let outcome = match TaskStatus::try_from(status.as_str()) {
        Ok(target) => {
            MoveOutcome::Applied(run_async(world.service.change_status(actor, task_id, target)))
        }
        Err(err) => MoveOutcome::UnknownStatus(err),
    };
    world.last_move = Some(outcome);
    Ok(())
}
