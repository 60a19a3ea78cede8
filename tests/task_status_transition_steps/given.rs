//! Given steps for task status transition BDD scenarios.

use super::world::{StatusTransitionWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskmaster::tracker::{
    domain::TaskStatus,
    services::{CreateProjectRequest, CreateTaskRequest},
};

#[given(r#"a project "{name}" created by "{handle}""#)]
fn project_created_by(
    world: &mut StatusTransitionWorld,
    name: String,
    handle: String,
) -> Result<(), eyre::Report> {
    let creator = world.ensure_user(&handle)?;
    let created = run_async(
        world
            .service
            .create_project(creator.id(), CreateProjectRequest::new(name)),
    )
    .wrap_err("create project for transition scenario")?;
    world.project = Some(created);
    Ok(())
}

#[given(r#"a task "{title}" in the project"#)]
fn task_in_project(world: &mut StatusTransitionWorld, title: String) -> Result<(), eyre::Report> {
    let owner = world.owner()?.id();
    let project_id = world.project()?.id();
    let created = run_async(world.service.create_task(
        owner,
        project_id,
        CreateTaskRequest::new(title),
    ))
    .wrap_err("create task for transition scenario")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#"a registered user "{handle}""#)]
fn registered_user(world: &mut StatusTransitionWorld, handle: String) -> Result<(), eyre::Report> {
    world.ensure_user(&handle)?;
    Ok(())
}

#[given(r#"the task has been moved to "{status}""#)]
fn task_has_been_moved(
    world: &mut StatusTransitionWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario setup: {err}"))?;
    let owner = world.owner()?.id();
    let task_id = world.task()?.id();
    let moved = run_async(world.service.change_status(owner, task_id, target))
        .wrap_err("move task in scenario setup")?;
    world.task = Some(moved);
    Ok(())
}
