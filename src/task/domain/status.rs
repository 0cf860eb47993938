//! Task and subtask status with its transition table.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status shared by tasks and subtasks.
///
/// Variants are declared in board lane order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Todo,
    /// Work is under way.
    InProgress,
    /// Work is awaiting review.
    InReview,
    /// Work cannot proceed.
    Blocked,
    /// Work is finished.
    Completed,
    /// Parked, usually after the deadline passed.
    Backlog,
    /// Work was abandoned.
    Cancelled,
}

impl TaskStatus {
    /// Every status in lane order.
    pub const ALL: [Self; 7] = [
        Self::Todo,
        Self::InProgress,
        Self::InReview,
        Self::Blocked,
        Self::Completed,
        Self::Backlog,
        Self::Cancelled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::InReview => "IN_REVIEW",
            Self::Blocked => "BLOCKED",
            Self::Completed => "COMPLETED",
            Self::Backlog => "BACKLOG",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns whether a direct transition to `target` is allowed.
    ///
    /// Terminal statuses have no outgoing edges; they are left only through
    /// an explicit reopen.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Backlog,
                Self::Todo | Self::InProgress | Self::Cancelled
            ) | (
                Self::Todo,
                Self::InProgress | Self::Blocked | Self::Completed | Self::Backlog | Self::Cancelled
            ) | (
                Self::InProgress,
                Self::Todo
                    | Self::InReview
                    | Self::Blocked
                    | Self::Completed
                    | Self::Backlog
                    | Self::Cancelled
            ) | (
                Self::InReview,
                Self::InProgress | Self::Blocked | Self::Completed | Self::Cancelled
            ) | (
                Self::Blocked,
                Self::Todo | Self::InProgress | Self::Backlog | Self::Cancelled
            )
        )
    }

    /// Returns whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether an overdue item in this status is moved to the backlog.
    ///
    /// Terminal statuses are excluded: promotion clears `completed_at`, and a
    /// finished or cancelled task must only leave its state through a reopen.
    #[must_use]
    pub const fn is_promotable(self) -> bool {
        !matches!(self, Self::Backlog | Self::Completed | Self::Cancelled)
    }

    /// Returns whether the status is a valid reopen target.
    #[must_use]
    pub const fn is_reopen_target(self) -> bool {
        matches!(self, Self::Todo | Self::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    /// Accepts the storage form case-insensitively, with `-` or spaces in
    /// place of underscores.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "IN_REVIEW" => Ok(Self::InReview),
            "BLOCKED" => Ok(Self::Blocked),
            "COMPLETED" => Ok(Self::Completed),
            "BACKLOG" => Ok(Self::Backlog),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
