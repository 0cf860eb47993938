//! Shared wiring for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    services::{CommentService, TaskLifecycleService},
};
use taskboard::team::{adapters::memory::InMemoryTeamRepository, services::TeamService};
use taskboard::user::domain::UserId;

/// Services sharing one in-memory task store.
pub struct App {
    pub store: Arc<InMemoryTaskRepository>,
    pub tasks: Arc<TaskLifecycleService<InMemoryTaskRepository, DefaultClock>>,
    pub comments: CommentService<InMemoryTaskRepository, DefaultClock>,
    pub teams: TeamService<InMemoryTeamRepository, InMemoryTaskRepository, DefaultClock>,
}

/// Fixture wiring every service against fresh in-memory stores.
#[fixture]
pub fn app() -> App {
    let store = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    App {
        tasks: Arc::new(TaskLifecycleService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
        )),
        comments: CommentService::new(Arc::clone(&store), Arc::clone(&clock)),
        teams: TeamService::new(
            Arc::new(InMemoryTeamRepository::new()),
            Arc::clone(&store),
            clock,
        ),
        store,
    }
}

/// Builds a user identifier.
///
/// # Errors
///
/// Returns an error when `raw` is not a valid identifier.
pub fn user(raw: &str) -> Result<UserId, eyre::Report> {
    Ok(UserId::new(raw)?)
}
