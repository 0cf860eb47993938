//! When steps for backlog promotion scenarios.

use super::world::{BacklogWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("{days:u64} days pass and the backlog job runs")]
fn days_pass_and_job_runs(world: &mut BacklogWorld, days: u64) -> Result<(), eyre::Report> {
    world.clock.advance(Duration::days(i64::try_from(days)?));
    run_job(world)
}

#[when("the backlog job runs again")]
fn job_runs_again(world: &mut BacklogWorld) -> Result<(), eyre::Report> {
    run_job(world)
}

fn run_job(world: &mut BacklogWorld) -> Result<(), eyre::Report> {
    let promotion = run_async(world.job.run_once()).wrap_err("run backlog pass")?;
    world.last_promotion = Some(promotion);
    Ok(())
}
