//! Tags shared by tasks and teams.

use super::{TagId, TaskDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a tag name.
const MAX_TAG_NAME_LENGTH: usize = 50;

/// Color given to tags created implicitly by name.
const DEFAULT_TAG_COLOR: &str = "#000000";

/// Trimmed, case-preserving tag name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    /// Creates a validated tag name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTagName`] for blank input and
    /// [`TaskDomainError::TagNameTooLong`] past 50 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTagName);
        }
        if trimmed.chars().count() > MAX_TAG_NAME_LENGTH {
            return Err(TaskDomainError::TagNameTooLong(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex color in `#rrggbb` form, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagColor(String);

impl TagColor {
    /// Creates a validated color.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTagColor`] unless the value is `#`
    /// followed by six hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let is_valid = trimmed
            .strip_prefix('#')
            .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()));
        if !is_valid {
            return Err(TaskDomainError::InvalidTagColor(raw));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Returns the color as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TagColor {
    fn default() -> Self {
        Self(DEFAULT_TAG_COLOR.to_owned())
    }
}

/// Named, colored label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    name: TagName,
    color: TagColor,
    created_at: DateTime<Utc>,
}

impl Tag {
    /// Creates a new tag.
    #[must_use]
    pub fn new(name: TagName, color: TagColor, clock: &impl Clock) -> Self {
        Self {
            id: TagId::new(),
            name,
            color,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a tag from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: TagId,
        name: TagName,
        color: TagColor,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            color,
            created_at,
        }
    }

    /// Returns the tag identifier.
    #[must_use]
    pub const fn id(&self) -> TagId {
        self.id
    }

    /// Returns the tag name.
    #[must_use]
    pub const fn name(&self) -> &TagName {
        &self.name
    }

    /// Returns the tag color.
    #[must_use]
    pub const fn color(&self) -> &TagColor {
        &self.color
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
