//! Canonical task query shared by every listing.

use crate::task::domain::{Task, TaskStatus};
use crate::team::domain::TeamId;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Predicate over tasks. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Creator or assignee.
    pub visible_to: Option<UserId>,
    /// Assignee.
    pub assignee: Option<UserId>,
    /// Creator.
    pub creator: Option<UserId>,
    /// Allowed statuses.
    pub statuses: Option<BTreeSet<TaskStatus>>,
    /// Owning team.
    pub team: Option<TeamId>,
    /// Inclusive lower deadline bound.
    pub deadline_from: Option<DateTime<Utc>>,
    /// Exclusive upper deadline bound.
    pub deadline_before: Option<DateTime<Utc>>,
    /// Whether archived tasks are returned.
    pub include_archived: bool,
}

impl TaskFilter {
    /// Returns whether `task` satisfies every set field.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.visible_to
            .as_ref()
            .is_none_or(|user| task.is_visible_to(user))
            && self
                .assignee
                .as_ref()
                .is_none_or(|user| task.assignees().contains(user))
            && self.creator.as_ref().is_none_or(|user| task.is_creator(user))
            && self
                .statuses
                .as_ref()
                .is_none_or(|statuses| statuses.contains(&task.status()))
            && self.team.is_none_or(|team| task.team() == Some(team))
            && self.deadline_from.is_none_or(|from| task.deadline() >= from)
            && self
                .deadline_before
                .is_none_or(|before| task.deadline() < before)
            && (self.include_archived || !task.is_archived())
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskOrder {
    /// Earliest deadline first.
    #[default]
    DeadlineAsc,
    /// Newest first.
    CreatedDesc,
    /// Most recently updated first.
    UpdatedDesc,
}

impl TaskOrder {
    /// Sorts `tasks` in place; ties fall back to the task identifier.
    pub fn sort(self, tasks: &mut [Task]) {
        match self {
            Self::DeadlineAsc => tasks.sort_by_key(|task| (task.deadline(), task.id())),
            Self::CreatedDesc => tasks.sort_by(|left, right| {
                right
                    .created_at()
                    .cmp(&left.created_at())
                    .then_with(|| left.id().cmp(&right.id()))
            }),
            Self::UpdatedDesc => tasks.sort_by(|left, right| {
                right
                    .updated_at()
                    .cmp(&left.updated_at())
                    .then_with(|| left.id().cmp(&right.id()))
            }),
        }
    }
}

/// Task listing request.
///
/// # Examples
///
/// ```
/// use taskboard::task::domain::TaskStatus;
/// use taskboard::task::ports::TaskQuery;
/// use taskboard::user::domain::UserId;
///
/// let user = UserId::new("user_1").expect("valid user id");
/// let query = TaskQuery::backlog_for(user.clone());
/// assert_eq!(query.filter.visible_to, Some(user));
/// assert!(query.filter.statuses.is_some_and(|s| s.contains(&TaskStatus::Backlog)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Predicate.
    pub filter: TaskFilter,
    /// Ordering.
    pub order: TaskOrder,
    /// Maximum number of results.
    pub take: Option<usize>,
}

impl TaskQuery {
    /// Tasks the user created or is assigned to.
    #[must_use]
    pub fn visible_to(user: UserId) -> Self {
        Self::from_filter(TaskFilter {
            visible_to: Some(user),
            ..TaskFilter::default()
        })
    }

    /// Tasks assigned to the user.
    #[must_use]
    pub fn assigned_to(user: UserId) -> Self {
        Self::from_filter(TaskFilter {
            assignee: Some(user),
            ..TaskFilter::default()
        })
    }

    /// Tasks the user created.
    #[must_use]
    pub fn created_by(user: UserId) -> Self {
        Self::from_filter(TaskFilter {
            creator: Some(user),
            ..TaskFilter::default()
        })
    }

    /// Open tasks visible to the user whose deadline is still ahead.
    #[must_use]
    pub fn upcoming_for(user: UserId, now: DateTime<Utc>) -> Self {
        let statuses = TaskStatus::ALL
            .into_iter()
            .filter(|status| status.is_promotable())
            .collect();
        Self::from_filter(TaskFilter {
            visible_to: Some(user),
            statuses: Some(statuses),
            deadline_from: Some(now),
            ..TaskFilter::default()
        })
    }

    /// Backlogged tasks visible to the user.
    #[must_use]
    pub fn backlog_for(user: UserId) -> Self {
        Self::from_filter(TaskFilter {
            visible_to: Some(user),
            statuses: Some(BTreeSet::from([TaskStatus::Backlog])),
            ..TaskFilter::default()
        })
    }

    /// The user's most recently created visible tasks.
    #[must_use]
    pub fn latest_for(user: UserId, take: usize) -> Self {
        Self::visible_to(user)
            .ordered_by(TaskOrder::CreatedDesc)
            .take(take)
    }

    /// Tasks owned by a team.
    #[must_use]
    pub fn for_team(team: TeamId) -> Self {
        Self::from_filter(TaskFilter {
            team: Some(team),
            ..TaskFilter::default()
        })
    }

    /// Wraps a filter with default ordering and no limit.
    #[must_use]
    pub fn from_filter(filter: TaskFilter) -> Self {
        Self {
            filter,
            order: TaskOrder::default(),
            take: None,
        }
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn ordered_by(mut self, order: TaskOrder) -> Self {
        self.order = order;
        self
    }

    /// Limits the number of results.
    #[must_use]
    pub const fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    /// Includes archived tasks.
    #[must_use]
    pub const fn with_archived(mut self) -> Self {
        self.filter.include_archived = true;
        self
    }

    /// Filters, orders and truncates an in-memory task set.
    #[must_use]
    pub fn apply(&self, tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
        let mut selected: Vec<Task> = tasks
            .into_iter()
            .filter(|task| self.filter.matches(task))
            .collect();
        self.order.sort(&mut selected);
        if let Some(limit) = self.take {
            selected.truncate(limit);
        }
        selected
    }
}

/// Related records to load alongside a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskIncludes {
    /// Load subtasks.
    pub sub_tasks: bool,
    /// Load task-level comment threads.
    pub comments: bool,
}

impl TaskIncludes {
    /// Loads nothing beyond the task row.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            sub_tasks: false,
            comments: false,
        }
    }

    /// Loads every relation.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            sub_tasks: true,
            comments: true,
        }
    }
}
