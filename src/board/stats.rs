//! Dashboard counters.

use crate::task::domain::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary figures shown above the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    /// All tasks.
    pub total: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Open tasks whose deadline is still ahead.
    pub upcoming: usize,
    /// Open tasks whose deadline has passed.
    pub overdue: usize,
    /// Completed share of all tasks, rounded to a whole percent.
    pub progress_percent: usize,
}

impl BoardStats {
    /// Computes the counters at `now`.
    ///
    /// Completed and cancelled tasks count as neither upcoming nor overdue.
    #[must_use]
    pub fn compute<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: DateTime<Utc>) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            stats.total += 1;
            let status = task.status();
            if status == TaskStatus::Completed {
                stats.completed += 1;
            }
            if status.is_terminal() {
                continue;
            }
            if task.deadline() > now {
                stats.upcoming += 1;
            } else if task.is_overdue(now) {
                stats.overdue += 1;
            }
        }
        stats.progress_percent = rounded_percent(stats.completed, stats.total);
        stats
    }
}

/// `part / whole` as a percentage rounded half up; zero for an empty whole.
fn rounded_percent(part: usize, whole: usize) -> usize {
    part.saturating_mul(200)
        .saturating_add(whole)
        .checked_div(whole.saturating_mul(2))
        .unwrap_or(0)
}
