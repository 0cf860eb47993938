//! Error types for task domain validation and parsing.

use super::{TaskStatus, WorkItemRef};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing or mutating task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The comment text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyCommentText,

    /// An hour estimate is negative or not a finite number.
    #[error("invalid hour value {0}, expected a finite non-negative number")]
    InvalidHours(String),

    /// The start date falls after the deadline.
    #[error("start date {start} is after deadline {deadline}")]
    StartAfterDeadline {
        /// Requested start date.
        start: DateTime<Utc>,
        /// Requested deadline.
        deadline: DateTime<Utc>,
    },

    /// The tag name is empty after trimming.
    #[error("tag name must not be empty")]
    EmptyTagName,

    /// The tag name exceeds the maximum length.
    #[error("tag name '{0}' exceeds 50 characters")]
    TagNameTooLong(String),

    /// The tag color is not a `#rrggbb` value.
    #[error("invalid tag color '{0}', expected #rrggbb")]
    InvalidTagColor(String),

    /// An assignment request named no users.
    #[error("at least one assignee is required")]
    EmptyAssigneeList,

    /// The transition is not permitted by the status table.
    #[error("{item} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Work item being transitioned.
        item: WorkItemRef,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// Only completed or cancelled items can be reopened.
    #[error("{item} is {status} and cannot be reopened")]
    NotReopenable {
        /// Work item being reopened.
        item: WorkItemRef,
        /// Current status.
        status: TaskStatus,
    },

    /// Reopening must land in `TODO` or `IN_PROGRESS`.
    #[error("{item} cannot be reopened into {target}")]
    InvalidReopenTarget {
        /// Work item being reopened.
        item: WorkItemRef,
        /// Requested status.
        target: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
