//! Status state machine shared by tasks and subtasks.

use super::{TaskDomainError, TaskStatus, WorkItemRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current status together with its completion timestamp.
///
/// `completed_at` is `Some` exactly when the status is
/// [`TaskStatus::Completed`]; every mutation goes through this type so the
/// pair cannot drift apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLifecycle {
    status: TaskStatus,
    completed_at: Option<DateTime<Utc>>,
}

impl StatusLifecycle {
    /// Lifecycle of a newly created item.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: TaskStatus::Todo,
            completed_at: None,
        }
    }

    /// Rebuilds a lifecycle from stored columns.
    ///
    /// A stale `completed_at` on a non-completed row is dropped, and a
    /// completed row missing its timestamp takes `fallback`.
    #[must_use]
    pub fn from_persisted(
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
        fallback: DateTime<Utc>,
    ) -> Self {
        let completed_at =
            (status == TaskStatus::Completed).then(|| completed_at.unwrap_or(fallback));
        Self {
            status,
            completed_at,
        }
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns when the item was completed, if it currently is.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Moves to `target` if the transition table allows it.
    ///
    /// Returns `Ok(false)` when `target` equals the current status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] for edges missing
    /// from the table, including every edge out of a terminal status.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        item: WorkItemRef,
        now: DateTime<Utc>,
    ) -> Result<bool, TaskDomainError> {
        if target == self.status {
            return Ok(false);
        }
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                item,
                from: self.status,
                to: target,
            });
        }
        self.set(target, now);
        Ok(true)
    }

    /// Leaves a terminal status for `TODO` or `IN_PROGRESS`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotReopenable`] when the current status is
    /// not terminal and [`TaskDomainError::InvalidReopenTarget`] for any
    /// other target.
    pub fn reopen(
        &mut self,
        target: TaskStatus,
        item: WorkItemRef,
        now: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if !self.status.is_terminal() {
            return Err(TaskDomainError::NotReopenable {
                item,
                status: self.status,
            });
        }
        if !target.is_reopen_target() {
            return Err(TaskDomainError::InvalidReopenTarget { item, target });
        }
        self.set(target, now);
        Ok(())
    }

    /// Parks a promotable item in the backlog, bypassing the table.
    ///
    /// Returns whether the status changed.
    pub fn force_backlog(&mut self) -> bool {
        if !self.status.is_promotable() {
            return false;
        }
        self.status = TaskStatus::Backlog;
        self.completed_at = None;
        true
    }

    fn set(&mut self, target: TaskStatus, now: DateTime<Utc>) {
        self.status = target;
        self.completed_at = (target == TaskStatus::Completed).then_some(now);
    }
}
