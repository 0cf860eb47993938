//! Given steps for task status transition scenarios.

use super::world::{TaskStatusWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::task::{domain::TaskStatus, services::CreateTaskRequest};
use taskboard::user::domain::UserId;

#[given(r#"a task "{title}" created by "{creator}""#)]
fn task_created_by(
    world: &mut TaskStatusWorld,
    title: String,
    creator: String,
) -> Result<(), eyre::Report> {
    let creator_id = UserId::new(creator)?;
    let request = CreateTaskRequest::new(title, Utc::now() + Duration::days(7));
    let created = run_async(world.service.create_task(&creator_id, request))
        .wrap_err("create task for status scenario")?;
    world.creator = Some(creator_id);
    world.task = Some(created);
    Ok(())
}

#[given(r#"the task has been moved to "{status}""#)]
fn task_has_been_moved(world: &mut TaskStatusWorld, status: String) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())?;
    let creator = world.creator()?.clone();
    let id = world.task()?.id();
    let moved = run_async(world.service.set_task_status(&creator, id, target))
        .wrap_err("move task in scenario setup")?;
    world.task = Some(moved);
    Ok(())
}
