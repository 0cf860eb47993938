//! Then steps for backlog promotion scenarios.

use super::world::{BacklogWorld, run_async};
use rstest_bdd_macros::then;
use taskboard::task::{domain::TaskStatus, ports::TaskIncludes};

fn assert_promoted(world: &BacklogWorld, count: u64) -> Result<(), eyre::Report> {
    let promotion = world
        .last_promotion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("backlog job has not run"))?;
    eyre::ensure!(
        u64::try_from(promotion.count())? == count,
        "expected {count} promoted tasks, found {}",
        promotion.count()
    );
    Ok(())
}

#[then("{count:u64} task is promoted")]
fn one_task_promoted(world: &BacklogWorld, count: u64) -> Result<(), eyre::Report> {
    assert_promoted(world, count)
}

#[then("{count:u64} tasks are promoted")]
fn tasks_promoted(world: &BacklogWorld, count: u64) -> Result<(), eyre::Report> {
    assert_promoted(world, count)
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &BacklogWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())?;
    let (owner, id) = world.task()?;
    let stored = run_async(world.service.get_task(owner, id, TaskIncludes::none()))?;
    eyre::ensure!(
        stored.task.status() == expected,
        "expected status {expected}, found {}",
        stored.task.status()
    );
    Ok(())
}
