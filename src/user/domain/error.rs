//! Error types for user domain validation.

use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The external subject identifier is empty after trimming.
    #[error("user identifier must not be empty")]
    EmptyUserId,

    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}
