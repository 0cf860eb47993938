//! Lane-grouped timeline of tasks.

use super::{LaneLayout, TimelineError, TimelineItem, TimelineWindow, layout_by_lane};
use crate::task::domain::{Task, TaskId, TaskStatus};

/// Timeline screen model.
///
/// Backlogged tasks have no meaningful bar any more and are listed
/// separately instead of being laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineView {
    window: TimelineWindow,
    lanes: Vec<LaneLayout<TaskId>>,
    backlog: Vec<TaskId>,
}

impl TimelineView {
    /// Lays out `tasks` against `window`.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvertedRange`] when a task's start date lies
    /// after its deadline.
    pub fn build(tasks: &[Task], window: TimelineWindow) -> Result<Self, TimelineError> {
        let (backlogged, scheduled): (Vec<&Task>, Vec<&Task>) = tasks
            .iter()
            .partition(|task| task.status() == TaskStatus::Backlog);
        let items = scheduled
            .into_iter()
            .map(TimelineItem::from_task)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            window,
            lanes: layout_by_lane(&items, &window),
            backlog: backlogged.into_iter().map(Task::id).collect(),
        })
    }

    /// Window the view was built for.
    #[must_use]
    pub const fn window(&self) -> TimelineWindow {
        self.window
    }

    /// Non-empty lanes in status order.
    #[must_use]
    pub fn lanes(&self) -> &[LaneLayout<TaskId>] {
        &self.lanes
    }

    /// Lane for `status`, if it holds any task.
    #[must_use]
    pub fn lane(&self, status: TaskStatus) -> Option<&LaneLayout<TaskId>> {
        self.lanes.iter().find(|lane| lane.lane == status)
    }

    /// Backlogged tasks in input order.
    #[must_use]
    pub fn backlog(&self) -> &[TaskId] {
        &self.backlog
    }
}
