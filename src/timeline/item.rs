//! Items placed on the timeline.

use super::TimelineError;
use crate::task::domain::{Task, TaskId, TaskStatus};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Validated day range with `start <= end`.
///
/// Ranges are half-open: `[start, end)`. A zero-length range still occupies
/// its start day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DayRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvertedRange`] when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TimelineError> {
        if start > end {
            return Err(TimelineError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day.
    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.start
    }

    /// Exclusive end day.
    #[must_use]
    pub const fn end(self) -> NaiveDate {
        self.end
    }

    /// Number of days between start and end.
    #[must_use]
    pub fn duration_days(self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Returns whether the occupied intervals intersect.
    ///
    /// Touching endpoints do not overlap.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        let (start, end) = self.occupied();
        let (other_start, other_end) = other.occupied();
        start < other_end && other_start < end
    }

    /// Occupied interval as day numbers, at least one day long.
    pub(super) fn occupied(self) -> (i64, i64) {
        let start = day_number(self.start);
        (start, day_number(self.end).max(start + 1))
    }
}

pub(super) fn day_number(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Bar on the timeline, keyed by `K`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineItem<K> {
    id: K,
    range: DayRange,
    lane: TaskStatus,
}

impl<K> TimelineItem<K> {
    /// Creates an item spanning `start..end` in `lane`.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvertedRange`] when `start > end`.
    pub fn new(
        id: K,
        start: NaiveDate,
        end: NaiveDate,
        lane: TaskStatus,
    ) -> Result<Self, TimelineError> {
        Ok(Self {
            id,
            range: DayRange::new(start, end)?,
            lane,
        })
    }

    /// Creates an item from timestamps truncated to their UTC day.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvertedRange`] when the start day falls
    /// after the end day.
    pub fn from_timestamps(
        id: K,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        lane: TaskStatus,
    ) -> Result<Self, TimelineError> {
        Self::new(id, start.date_naive(), end.date_naive(), lane)
    }

    /// Item identifier.
    #[must_use]
    pub const fn id(&self) -> &K {
        &self.id
    }

    /// Day range.
    #[must_use]
    pub const fn range(&self) -> DayRange {
        self.range
    }

    /// Lane the item is drawn in.
    #[must_use]
    pub const fn lane(&self) -> TaskStatus {
        self.lane
    }
}

impl TimelineItem<TaskId> {
    /// Derives the bar for a task.
    ///
    /// The bar runs from the planned start, or the creation time capped at
    /// the deadline when no start is set, to the deadline. The lane is the
    /// task status.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvertedRange`] for a persisted task whose
    /// start date lies after its deadline.
    pub fn from_task(task: &Task) -> Result<Self, TimelineError> {
        let deadline = task.deadline();
        let start = task
            .start_date()
            .unwrap_or_else(|| task.created_at().min(deadline));
        Self::from_timestamps(task.id(), start, deadline, task.status())
    }
}
