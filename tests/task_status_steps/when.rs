//! When steps for task status transition scenarios.

use super::world::{TaskStatusWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::task::domain::TaskStatus;
use taskboard::user::domain::UserId;

#[when(r#""{actor}" moves the task to "{status}""#)]
fn move_task(world: &mut TaskStatusWorld, actor: String, status: String) -> Result<(), eyre::Report> {
    let actor_id = UserId::new(actor)?;
    let target = TaskStatus::try_from(status.as_str())?;
    let id = world.task()?.id();
    let result = run_async(world.service.set_task_status(&actor_id, id, target));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" reopens the task into "{status}""#)]
fn reopen_task(world: &mut TaskStatusWorld, actor: String, status: String) -> Result<(), eyre::Report> {
    let actor_id = UserId::new(actor)?;
    let target = TaskStatus::try_from(status.as_str())?;
    let id = world.task()?.id();
    let result = run_async(world.service.reopen_task(&actor_id, id, target));
    world.record(result);
    Ok(())
}
