//! Shared world state for task status transition scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::{TaskLifecycleError, TaskLifecycleService},
};
use taskboard::user::domain::UserId;

/// Service type used by the scenario world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for status transition behaviour tests.
pub struct TaskStatusWorld {
    pub service: TestTaskService,
    pub creator: Option<UserId>,
    pub task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskStatusWorld {
    /// Creates a world backed by an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: TaskLifecycleService::new(
                Arc::new(InMemoryTaskRepository::new()),
                Arc::new(DefaultClock),
            ),
            creator: None,
            task: None,
            last_result: None,
        }
    }

    /// Returns the scenario task or an error if none was created.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the creator of the scenario task.
    pub fn creator(&self) -> Result<&UserId, eyre::Report> {
        self.creator
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing creator in scenario world"))
    }

    /// Records a service result, keeping the task current on success.
    pub fn record(&mut self, result: Result<Task, TaskLifecycleError>) {
        if let Ok(ref updated) = result {
            self.task = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for TaskStatusWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskStatusWorld {
    TaskStatusWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
