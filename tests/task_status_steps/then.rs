//! Then steps for task status transition scenarios.

use super::world::{TaskStatusWorld, run_async};
use rstest_bdd_macros::then;
use taskboard::task::{
    domain::{TaskDomainError, TaskStatus},
    ports::TaskIncludes,
    services::TaskLifecycleError,
};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskStatusWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())?;
    let creator = world.creator()?;
    let id = world.task()?.id();
    let stored = run_async(world.service.get_task(creator, id, TaskIncludes::none()))?;
    eyre::ensure!(
        stored.task.status() == expected,
        "expected status {expected}, found {}",
        stored.task.status()
    );
    Ok(())
}

#[then("the task has a completion time")]
fn task_has_completion_time(world: &TaskStatusWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.task()?.completed_at().is_some(),
        "expected a completion time"
    );
    Ok(())
}

#[then("the task has no completion time")]
fn task_has_no_completion_time(world: &TaskStatusWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.task()?.completed_at().is_none(),
        "expected no completion time"
    );
    Ok(())
}

#[then("the move fails with an invalid status transition error")]
fn move_fails_with_invalid_transition(world: &TaskStatusWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;
    eyre::ensure!(
        matches!(
            result,
            Err(TaskLifecycleError::Domain(
                TaskDomainError::InvalidStatusTransition { .. }
            ))
        ),
        "expected InvalidStatusTransition error, got {result:?}"
    );
    Ok(())
}

#[then("the move fails as unauthorized")]
fn move_fails_as_unauthorized(world: &TaskStatusWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;
    eyre::ensure!(
        matches!(result, Err(TaskLifecycleError::Unauthorized { .. })),
        "expected Unauthorized error, got {result:?}"
    );
    Ok(())
}
