//! Given steps for task completion BDD scenarios.

use super::world::{TaskCompletionWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::task::{domain::TaskStatus, services::CreateTaskRequest};

#[given(r#"a "{status}" task titled "{title}""#)]
fn task_with_status(
    world: &mut TaskCompletionWorld,
    status: String,
    title: String,
) -> Result<(), eyre::Report> {
    let parsed = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let created = run_async(world.service.create_task(
        world.owner,
        CreateTaskRequest::new(title).with_status(parsed),
    ))
    .wrap_err("create task for completion scenario")?;
    world.original = Some(created.clone());
    world.task = Some(created);
    Ok(())
}

#[given("{hours:i64} hours pass")]
fn hours_pass(world: &mut TaskCompletionWorld, hours: i64) {
    world.clock.advance(Duration::hours(hours));
}
