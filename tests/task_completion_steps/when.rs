//! When steps for task completion BDD scenarios.

use super::world::{TaskCompletionWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::task::{domain::TaskStatus, services::UpdateTaskRequest};
use taskboard::user::UserId;

fn record_update(
    world: &mut TaskCompletionWorld,
    request: UpdateTaskRequest,
    owner: UserId,
) -> Result<(), eyre::Report> {
    let id = world.task()?.id();
    let result = run_async(world.service.update_task(id, request, Some(owner)));
    if let Ok(ref updated) = result {
        world.task = Some(updated.clone());
    }
    world.last_update = Some(result);
    Ok(())
}

fn status_request(status: &str) -> Result<UpdateTaskRequest, eyre::Report> {
    let parsed = TaskStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    Ok(UpdateTaskRequest::new().with_status(parsed))
}

#[when(r#"the owner changes the task status to "{status}""#)]
fn owner_changes_status(
    world: &mut TaskCompletionWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let request = status_request(&status)?;
    let owner = world.owner;
    record_update(world, request, owner)
}

#[when("the owner ticks the completed box")]
fn owner_ticks_completed(world: &mut TaskCompletionWorld) -> Result<(), eyre::Report> {
    let request = world
        .service
        .apply_completed_flag(UpdateTaskRequest::new(), true);
    let owner = world.owner;
    record_update(world, request, owner)
}

#[when(r#"another user changes the task status to "{status}""#)]
fn another_user_changes_status(
    world: &mut TaskCompletionWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let request = status_request(&status)?;
    record_update(world, request, UserId::new())
}
