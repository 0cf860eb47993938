//! Validated email address value object.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an email address, matching the `VARCHAR(320)` column.
const MAX_EMAIL_LENGTH: usize = 320;

/// Trimmed email address with a single `@` separating non-empty parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidEmail`] when the value is empty,
    /// overlong, contains whitespace, or lacks a local part or domain.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && parts.next().is_none()
            && normalized.len() <= MAX_EMAIL_LENGTH
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(UserDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
