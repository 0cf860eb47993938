//! Deadline-driven backlog promotion and its periodic driver.

use super::access::logged;
use super::{TaskLifecycleResult, TaskLifecycleService};
use crate::task::{domain::TaskId, ports::TaskStore};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Outcome of one promotion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BacklogPromotion {
    /// Tasks moved to `BACKLOG`, sorted by identifier.
    pub promoted: Vec<TaskId>,
}

impl BacklogPromotion {
    /// Number of promoted tasks.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.promoted.len()
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Moves every task whose deadline is before `now` into `BACKLOG`.
    ///
    /// Tasks already in `BACKLOG`, `COMPLETED` or `CANCELLED` are skipped and
    /// keep their timestamps, so repeating a pass with the same `now`
    /// promotes nothing. Terminal tasks stay put because promotion bypasses
    /// the transition table and would otherwise reopen them without a
    /// reopen request. Promoted tasks get `updated_at = now`.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the bulk update fails.
    pub async fn promote_overdue_tasks_to_backlog(
        &self,
        now: DateTime<Utc>,
    ) -> TaskLifecycleResult<BacklogPromotion> {
        let promoted = logged(
            self.repository.promote_overdue_to_backlog(now).await,
            "promote_overdue_to_backlog",
        )?;
        if !promoted.is_empty() {
            info!(count = promoted.len(), %now, "promoted overdue tasks to backlog");
        }
        Ok(BacklogPromotion { promoted })
    }
}

/// Periodic trigger for [`TaskLifecycleService::promote_overdue_tasks_to_backlog`].
pub struct BacklogJob<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    service: Arc<TaskLifecycleService<R, C>>,
    interval: Duration,
}

impl<R, C> BacklogJob<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a job running every `interval`.
    #[must_use]
    pub const fn new(service: Arc<TaskLifecycleService<R, C>>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Runs a single pass using the service clock.
    ///
    /// # Errors
    ///
    /// Propagates the promotion error.
    pub async fn run_once(&self) -> TaskLifecycleResult<BacklogPromotion> {
        let now = self.service.clock.utc();
        self.service.promote_overdue_tasks_to_backlog(now).await
    }

    /// Runs passes until `shutdown` flips to `true` or its sender drops.
    ///
    /// The first pass runs immediately. A failed pass is logged and the job
    /// keeps its schedule.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = self.interval.as_secs(), "backlog job started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(outcome) => debug!(count = outcome.count(), "backlog pass finished"),
                        Err(err) => error!(error = %err, "backlog pass failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("backlog job stopped");
    }
}
