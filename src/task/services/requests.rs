//! Request and response types for task services.

use crate::task::domain::{
    CommentThread, Hours, SubTask, SubTaskDraft, TagName, Task, TaskDomainError, TaskDraft,
    TaskId, TaskPriority, Title,
};
use crate::team::domain::TeamId;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    title: String,
    deadline: DateTime<Utc>,
    description: Option<String>,
    priority: TaskPriority,
    start_date: Option<DateTime<Utc>>,
    assignees: Vec<UserId>,
    team: Option<TeamId>,
    tags: Vec<String>,
    related: Vec<TaskId>,
    estimated_hours: Option<f64>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title and deadline.
    #[must_use]
    pub fn new(title: impl Into<String>, deadline: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            deadline,
            description: None,
            priority: TaskPriority::default(),
            start_date: None,
            assignees: Vec::new(),
            team: None,
            tags: Vec::new(),
            related: Vec::new(),
            estimated_hours: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the planned start.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the initial assignees.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }

    /// Sets the owning team.
    #[must_use]
    pub const fn with_team(mut self, team: TeamId) -> Self {
        self.team = Some(team);
        self
    }

    /// Sets tag names.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets related or prerequisite tasks.
    #[must_use]
    pub fn with_related(mut self, related: impl IntoIterator<Item = TaskId>) -> Self {
        self.related = related.into_iter().collect();
        self
    }

    /// Sets the estimated effort in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Validates the request into a domain draft.
    pub(super) fn into_draft(self) -> Result<TaskDraft, TaskDomainError> {
        let tags = self
            .tags
            .into_iter()
            .map(TagName::new)
            .collect::<Result<_, _>>()?;
        Ok(TaskDraft {
            title: Title::new(self.title)?,
            description: self.description,
            priority: self.priority,
            deadline: self.deadline,
            start_date: self.start_date,
            assignees: self.assignees.into_iter().collect(),
            team: self.team,
            tags,
            related: self.related.into_iter().collect(),
            estimated_hours: self.estimated_hours.map(Hours::new).transpose()?,
        })
    }
}

/// Request payload for creating a subtask.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSubTaskRequest {
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    assignee: Option<UserId>,
    estimated_hours: Option<f64>,
}

impl CreateSubTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::default(),
            assignee: None,
            estimated_hours: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the estimated effort in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub(super) fn into_draft(self) -> Result<SubTaskDraft, TaskDomainError> {
        Ok(SubTaskDraft {
            title: Title::new(self.title)?,
            description: self.description,
            priority: self.priority,
            assignee: self.assignee,
            estimated_hours: self.estimated_hours.map(Hours::new).transpose()?,
        })
    }
}

/// Task with the relations requested through `TaskIncludes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDetails {
    /// The task itself.
    pub task: Task,
    /// Subtasks, oldest first, when requested.
    pub sub_tasks: Option<Vec<SubTask>>,
    /// Task-level comment threads, when requested.
    pub comments: Option<Vec<CommentThread>>,
}
