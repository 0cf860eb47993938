//! Given steps for backlog promotion scenarios.

use super::world::{BacklogWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use mockable::Clock;
use rstest_bdd_macros::given;
use taskboard::task::{domain::TaskStatus, services::CreateTaskRequest};
use taskboard::user::domain::UserId;

#[given(r#"a task "{title}" due in {days:u64} day"#)]
fn task_due_in(world: &mut BacklogWorld, title: String, days: u64) -> Result<(), eyre::Report> {
    let owner = UserId::new("ada")?;
    let deadline = world.clock.utc() + Duration::days(i64::try_from(days)?);
    let created = run_async(
        world
            .service
            .create_task(&owner, CreateTaskRequest::new(title, deadline)),
    )
    .wrap_err("create task for backlog scenario")?;
    world.owner = Some(owner);
    world.task = Some(created.id());
    Ok(())
}

#[given("the task has been completed")]
fn task_has_been_completed(world: &mut BacklogWorld) -> Result<(), eyre::Report> {
    let (owner, id) = world.task()?;
    run_async(
        world
            .service
            .set_task_status(owner, id, TaskStatus::Completed),
    )
    .wrap_err("complete task in scenario setup")?;
    Ok(())
}
