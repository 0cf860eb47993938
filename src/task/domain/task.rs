//! Task aggregate root.

use super::{
    Hours, StatusLifecycle, TagName, TaskDomainError, TaskId, TaskPriority, TaskStatus, Title,
    WorkItemRef,
};
use crate::team::domain::TeamId;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    /// Task title.
    pub title: Title,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Deadline.
    pub deadline: DateTime<Utc>,
    /// Optional planned start.
    pub start_date: Option<DateTime<Utc>>,
    /// Initial assignees.
    pub assignees: BTreeSet<UserId>,
    /// Owning team, if any.
    pub team: Option<TeamId>,
    /// Tag names.
    pub tags: BTreeSet<TagName>,
    /// Related or prerequisite tasks.
    pub related: BTreeSet<TaskId>,
    /// Estimated effort.
    pub estimated_hours: Option<Hours>,
}

impl TaskDraft {
    /// Creates a draft with the two required fields.
    #[must_use]
    pub const fn new(title: Title, deadline: DateTime<Utc>) -> Self {
        Self {
            title,
            description: None,
            priority: TaskPriority::Medium,
            deadline,
            start_date: None,
            assignees: BTreeSet::new(),
            team: None,
            tags: BTreeSet::new(),
            related: BTreeSet::new(),
            estimated_hours: None,
        }
    }
}

/// Field changes applied by [`Task::apply_patch`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<Title>,
    /// New description; blank text clears it.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// New planned start.
    pub start_date: Option<DateTime<Utc>>,
    /// Replacement tag set.
    pub tags: Option<BTreeSet<TagName>>,
    /// New estimate.
    pub estimated_hours: Option<Hours>,
    /// New actual effort.
    pub actual_hours: Option<Hours>,
    /// New archived flag.
    pub archived: Option<bool>,
}

impl TaskPatch {
    /// Returns whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: Title,
    description: Option<String>,
    lifecycle: StatusLifecycle,
    priority: TaskPriority,
    deadline: DateTime<Utc>,
    start_date: Option<DateTime<Utc>>,
    creator: UserId,
    assignees: BTreeSet<UserId>,
    team: Option<TeamId>,
    tags: BTreeSet<TagName>,
    related: BTreeSet<TaskId>,
    estimated_hours: Option<Hours>,
    actual_hours: Option<Hours>,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: Title,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted deadline.
    pub deadline: DateTime<Utc>,
    /// Persisted planned start.
    pub start_date: Option<DateTime<Utc>>,
    /// Creating user.
    pub creator: UserId,
    /// Assigned users.
    pub assignees: BTreeSet<UserId>,
    /// Owning team.
    pub team: Option<TeamId>,
    /// Tag names.
    pub tags: BTreeSet<TagName>,
    /// Related tasks.
    pub related: BTreeSet<TaskId>,
    /// Estimated effort.
    pub estimated_hours: Option<Hours>,
    /// Actual effort.
    pub actual_hours: Option<Hours>,
    /// Archived flag.
    pub archived: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `TODO` task owned by `creator`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StartAfterDeadline`] when the draft's start
    /// date falls after its deadline.
    pub fn new(
        creator: UserId,
        draft: TaskDraft,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        ensure_schedule(draft.start_date, draft.deadline)?;
        let timestamp = clock.utc();
        let id = TaskId::new();
        let mut related = draft.related;
        related.remove(&id);

        Ok(Self {
            id,
            title: draft.title,
            description: normalize_description(draft.description),
            lifecycle: StatusLifecycle::new(),
            priority: draft.priority,
            deadline: draft.deadline,
            start_date: draft.start_date,
            creator,
            assignees: draft.assignees,
            team: draft.team,
            tags: draft.tags,
            related,
            estimated_hours: draft.estimated_hours,
            actual_hours: None,
            archived: false,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            lifecycle: StatusLifecycle::from_persisted(
                data.status,
                data.completed_at,
                data.updated_at,
            ),
            priority: data.priority,
            deadline: data.deadline,
            start_date: data.start_date,
            creator: data.creator,
            assignees: data.assignees,
            team: data.team,
            tags: data.tags,
            related: data.related,
            estimated_hours: data.estimated_hours,
            actual_hours: data.actual_hours,
            archived: data.archived,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.lifecycle.status()
    }

    /// Returns the completion timestamp while the task is completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle.completed_at()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the planned start, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn creator(&self) -> &UserId {
        &self.creator
    }

    /// Returns the assigned users.
    #[must_use]
    pub const fn assignees(&self) -> &BTreeSet<UserId> {
        &self.assignees
    }

    /// Returns the owning team, if any.
    #[must_use]
    pub const fn team(&self) -> Option<TeamId> {
        self.team
    }

    /// Returns the tag names.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<TagName> {
        &self.tags
    }

    /// Returns related or prerequisite tasks.
    #[must_use]
    pub const fn related(&self) -> &BTreeSet<TaskId> {
        &self.related
    }

    /// Returns the estimated effort.
    #[must_use]
    pub const fn estimated_hours(&self) -> Option<Hours> {
        self.estimated_hours
    }

    /// Returns the actual effort.
    #[must_use]
    pub const fn actual_hours(&self) -> Option<Hours> {
        self.actual_hours
    }

    /// Returns whether the task is archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user` created the task.
    #[must_use]
    pub fn is_creator(&self, user: &UserId) -> bool {
        &self.creator == user
    }

    /// Returns whether `user` is the creator or an assignee.
    #[must_use]
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        self.is_creator(user) || self.assignees.contains(user)
    }

    /// Returns whether the deadline has passed at `now`.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.deadline < now
    }

    /// Moves the task to `target` following the transition table.
    ///
    /// Returns whether the status changed; a same-status request leaves the
    /// timestamps untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] for disallowed
    /// edges.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        let now = clock.utc();
        let changed = self
            .lifecycle
            .transition_to(target, WorkItemRef::Task(self.id), now)?;
        if changed {
            self.updated_at = now;
        }
        Ok(changed)
    }

    /// Reopens a completed or cancelled task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotReopenable`] or
    /// [`TaskDomainError::InvalidReopenTarget`].
    pub fn reopen(&mut self, target: TaskStatus, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let now = clock.utc();
        self.lifecycle
            .reopen(target, WorkItemRef::Task(self.id), now)?;
        self.updated_at = now;
        Ok(())
    }

    /// Moves an overdue, promotable task to the backlog.
    ///
    /// Returns whether the task was promoted.
    pub fn promote_to_backlog(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_overdue(now) || !self.lifecycle.force_backlog() {
            return false;
        }
        self.updated_at = now;
        true
    }

    /// Applies field changes.
    ///
    /// The patch is validated as a whole before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StartAfterDeadline`] when the resulting
    /// schedule is inverted.
    pub fn apply_patch(&mut self, patch: TaskPatch, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let deadline = patch.deadline.unwrap_or(self.deadline);
        let start_date = patch.start_date.or(self.start_date);
        ensure_schedule(start_date, deadline)?;
        if patch.is_empty() {
            return Ok(());
        }

        let TaskPatch {
            title,
            description,
            priority,
            tags,
            estimated_hours,
            actual_hours,
            archived,
            ..
        } = patch;

        if let Some(value) = title {
            self.title = value;
        }
        if let Some(text) = description {
            self.description = normalize_description(Some(text));
        }
        if let Some(value) = priority {
            self.priority = value;
        }
        if let Some(value) = tags {
            self.tags = value;
        }
        if let Some(value) = estimated_hours {
            self.estimated_hours = Some(value);
        }
        if let Some(value) = actual_hours {
            self.actual_hours = Some(value);
        }
        if let Some(value) = archived {
            self.archived = value;
        }
        self.deadline = deadline;
        self.start_date = start_date;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Adds assignees, returning how many were new.
    pub fn assign(&mut self, users: impl IntoIterator<Item = UserId>, clock: &impl Clock) -> usize {
        let before = self.assignees.len();
        self.assignees.extend(users);
        let added = self.assignees.len() - before;
        if added > 0 {
            self.updated_at = clock.utc();
        }
        added
    }

    /// Removes an assignee, returning whether they were assigned.
    pub fn unassign(&mut self, user: &UserId, clock: &impl Clock) -> bool {
        let removed = self.assignees.remove(user);
        if removed {
            self.updated_at = clock.utc();
        }
        removed
    }
}

fn ensure_schedule(
    start_date: Option<DateTime<Utc>>,
    deadline: DateTime<Utc>,
) -> Result<(), TaskDomainError> {
    match start_date {
        Some(start) if start > deadline => {
            Err(TaskDomainError::StartAfterDeadline { start, deadline })
        }
        _ => Ok(()),
    }
}

pub(super) fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
