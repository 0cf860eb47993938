//! Shared world state for backlog promotion scenarios.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Local, Utc};
use mockable::Clock;
use rstest::fixture;
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::TaskId,
    services::{BacklogJob, BacklogPromotion, TaskLifecycleService},
};
use taskboard::user::domain::UserId;

/// Clock that only moves when a step advances it.
#[derive(Debug)]
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Service type used by the scenario world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskRepository, SteppingClock>;

/// Scenario world for backlog promotion behaviour tests.
pub struct BacklogWorld {
    pub clock: Arc<SteppingClock>,
    pub service: Arc<TestTaskService>,
    pub job: BacklogJob<InMemoryTaskRepository, SteppingClock>,
    pub owner: Option<UserId>,
    pub task: Option<TaskId>,
    pub last_promotion: Option<BacklogPromotion>,
}

impl BacklogWorld {
    /// Creates a world whose clock starts at 2025-03-10T09:00:00Z.
    #[must_use]
    pub fn new() -> Self {
        let start = DateTime::from_timestamp(1_741_597_200, 0).unwrap_or_default();
        let clock = Arc::new(SteppingClock::starting_at(start));
        let service = Arc::new(TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::clone(&clock),
        ));
        let job = BacklogJob::new(Arc::clone(&service), StdDuration::from_secs(60));
        Self {
            clock,
            service,
            job,
            owner: None,
            task: None,
            last_promotion: None,
        }
    }

    /// Returns the scenario task and its owner.
    pub fn task(&self) -> Result<(&UserId, TaskId), eyre::Report> {
        let owner = self
            .owner
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing owner in scenario world"))?;
        let task = self
            .task
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
        Ok((owner, task))
    }
}

impl Default for BacklogWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BacklogWorld {
    BacklogWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
