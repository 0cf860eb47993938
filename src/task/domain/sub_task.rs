//! Subtask entity owned by exactly one task.

use super::task::normalize_description;
use super::{
    Hours, StatusLifecycle, SubTaskId, TaskDomainError, TaskId, TaskPriority, TaskStatus, Title,
    WorkItemRef,
};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for creating a subtask.
#[derive(Debug, Clone, PartialEq)]
pub struct SubTaskDraft {
    /// Subtask title.
    pub title: Title,
    /// Optional description.
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional single assignee.
    pub assignee: Option<UserId>,
    /// Estimated effort.
    pub estimated_hours: Option<Hours>,
}

impl SubTaskDraft {
    /// Creates a draft with only a title.
    #[must_use]
    pub const fn new(title: Title) -> Self {
        Self {
            title,
            description: None,
            priority: TaskPriority::Medium,
            assignee: None,
            estimated_hours: None,
        }
    }
}

/// Field changes for a subtask. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubTaskPatch {
    /// New title.
    pub title: Option<Title>,
    /// New description; blank text clears it.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New assignee.
    pub assignee: Option<UserId>,
    /// New estimate.
    pub estimated_hours: Option<Hours>,
    /// New actual effort.
    pub actual_hours: Option<Hours>,
}

/// Subtask scoped under a parent task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTask {
    id: SubTaskId,
    task_id: TaskId,
    title: Title,
    description: Option<String>,
    lifecycle: StatusLifecycle,
    priority: TaskPriority,
    assignee: Option<UserId>,
    estimated_hours: Option<Hours>,
    actual_hours: Option<Hours>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted subtask.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSubTaskData {
    /// Subtask identifier.
    pub id: SubTaskId,
    /// Parent task.
    pub task_id: TaskId,
    /// Title.
    pub title: Title,
    /// Description.
    pub description: Option<String>,
    /// Status.
    pub status: TaskStatus,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Priority.
    pub priority: TaskPriority,
    /// Assignee.
    pub assignee: Option<UserId>,
    /// Estimated effort.
    pub estimated_hours: Option<Hours>,
    /// Actual effort.
    pub actual_hours: Option<Hours>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl SubTask {
    /// Creates a new `TODO` subtask under `task_id`.
    #[must_use]
    pub fn new(task_id: TaskId, draft: SubTaskDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SubTaskId::new(),
            task_id,
            title: draft.title,
            description: normalize_description(draft.description),
            lifecycle: StatusLifecycle::new(),
            priority: draft.priority,
            assignee: draft.assignee,
            estimated_hours: draft.estimated_hours,
            actual_hours: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a subtask from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSubTaskData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            title: data.title,
            description: data.description,
            lifecycle: StatusLifecycle::from_persisted(
                data.status,
                data.completed_at,
                data.updated_at,
            ),
            priority: data.priority,
            assignee: data.assignee,
            estimated_hours: data.estimated_hours,
            actual_hours: data.actual_hours,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> SubTaskId {
        self.id
    }

    /// Returns the parent task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
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

    /// Returns the completion timestamp while the subtask is completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle.completed_at()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&UserId> {
        self.assignee.as_ref()
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

    /// Returns whether `user` is the subtask assignee.
    #[must_use]
    pub fn is_assigned_to(&self, user: &UserId) -> bool {
        self.assignee.as_ref() == Some(user)
    }

    /// Moves the subtask to `target` following the transition table.
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
            .transition_to(target, WorkItemRef::SubTask(self.id), now)?;
        if changed {
            self.updated_at = now;
        }
        Ok(changed)
    }

    /// Reopens a completed or cancelled subtask.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotReopenable`] or
    /// [`TaskDomainError::InvalidReopenTarget`].
    pub fn reopen(&mut self, target: TaskStatus, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let now = clock.utc();
        self.lifecycle
            .reopen(target, WorkItemRef::SubTask(self.id), now)?;
        self.updated_at = now;
        Ok(())
    }

    /// Applies field changes.
    pub fn apply_patch(&mut self, patch: SubTaskPatch, clock: &impl Clock) {
        if patch == SubTaskPatch::default() {
            return;
        }
        if let Some(value) = patch.title {
            self.title = value;
        }
        if let Some(text) = patch.description {
            self.description = normalize_description(Some(text));
        }
        if let Some(value) = patch.priority {
            self.priority = value;
        }
        if let Some(value) = patch.assignee {
            self.assignee = Some(value);
        }
        if let Some(value) = patch.estimated_hours {
            self.estimated_hours = Some(value);
        }
        if let Some(value) = patch.actual_hours {
            self.actual_hours = Some(value);
        }
        self.updated_at = clock.utc();
    }
}
