//! Then steps for task completion BDD scenarios.

use super::world::TaskCompletionWorld;
use mockable::Clock;
use rstest_bdd_macros::then;
use taskboard::task::{domain::TaskStatus, services::TaskServiceError};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskCompletionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task()?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }

    Ok(())
}

#[then("the task was completed just now")]
fn completed_just_now(world: &TaskCompletionWorld) -> Result<(), eyre::Report> {
    let task = world.task()?;
    let now = world.clock.utc();

    if task.completed_at() != Some(now) {
        return Err(eyre::eyre!(
            "expected completion at {now}, found {:?}",
            task.completed_at()
        ));
    }

    Ok(())
}

#[then("the task has no completion time")]
fn no_completion_time(world: &TaskCompletionWorld) -> Result<(), eyre::Report> {
    let task = world.task()?;

    if let Some(completed_at) = task.completed_at() {
        return Err(eyre::eyre!("expected no completion time, found {completed_at}"));
    }

    Ok(())
}

#[then("the task keeps its original completion time")]
fn keeps_original_completion_time(world: &TaskCompletionWorld) -> Result<(), eyre::Report> {
    let original = world
        .original
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing original task"))?
        .completed_at();
    let current = world.task()?.completed_at();

    if original.is_none() || current != original {
        return Err(eyre::eyre!(
            "expected completion time {original:?}, found {current:?}"
        ));
    }

    Ok(())
}

#[then("the update fails because the task was not found")]
fn update_fails_not_found(world: &TaskCompletionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result"))?;

    if !matches!(result, Err(TaskServiceError::TaskNotFound(_))) {
        return Err(eyre::eyre!("expected TaskNotFound error, got {result:?}"));
    }

    Ok(())
}
