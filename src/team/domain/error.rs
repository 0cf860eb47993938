//! Error types for team domain validation.

use thiserror::Error;

/// Errors returned while constructing team values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamDomainError {
    /// The team name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyTeamName,

    /// The team name exceeds the storage limit.
    #[error("team name '{0}' exceeds 100 characters")]
    TeamNameTooLong(String),
}
