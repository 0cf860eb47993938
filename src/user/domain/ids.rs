//! Identifier type for mirrored users.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// External identity-provider subject identifier.
///
/// Unlike the UUID identifiers minted locally, user identifiers are issued by
/// the identity provider (for example `user_2abc...`) and are stored verbatim.
///
/// # Examples
///
/// ```
/// use taskboard::user::domain::UserId;
///
/// let id = UserId::new("  user_42 ").expect("valid user id");
/// assert_eq!(id.as_str(), "user_42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a validated user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyUserId`] when the value is empty after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyUserId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
