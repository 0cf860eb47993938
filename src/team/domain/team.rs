//! Team aggregate.

use super::{TeamDomainError, TeamId};
use crate::task::domain::TagName;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Maximum length for a team name.
const MAX_TEAM_NAME_LENGTH: usize = 100;

/// Trimmed, non-empty team name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Creates a validated team name.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::EmptyTeamName`] for blank input and
    /// [`TeamDomainError::TeamNameTooLong`] past 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TeamDomainError::EmptyTeamName);
        }
        if trimmed.chars().count() > MAX_TEAM_NAME_LENGTH {
            return Err(TeamDomainError::TeamNameTooLong(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Team of users sharing tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: TeamName,
    description: Option<String>,
    members: BTreeSet<UserId>,
    tags: BTreeSet<TagName>,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTeamData {
    /// Team identifier.
    pub id: TeamId,
    /// Team name.
    pub name: TeamName,
    /// Optional description.
    pub description: Option<String>,
    /// Member users.
    pub members: BTreeSet<UserId>,
    /// Tag names attached to the team.
    pub tags: BTreeSet<TagName>,
    /// Archived flag.
    pub archived: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a team with the given initial members.
    #[must_use]
    pub fn new(
        name: TeamName,
        members: impl IntoIterator<Item = UserId>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TeamId::new(),
            name,
            description: None,
            members: members.into_iter().collect(),
            tags: BTreeSet::new(),
            archived: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a team from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTeamData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            members: data.members,
            tags: data.tags,
            archived: data.archived,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Sets the description. Blank text clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let text = description.into();
        let trimmed = text.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Attaches tags to a new team.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagName>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the team name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the member users.
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<UserId> {
        &self.members
    }

    /// Returns the attached tag names.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<TagName> {
        &self.tags
    }

    /// Returns whether the team is archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user` belongs to the team.
    #[must_use]
    pub fn has_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// Adds members, returning how many were not already present.
    pub fn add_members(
        &mut self,
        users: impl IntoIterator<Item = UserId>,
        clock: &impl Clock,
    ) -> usize {
        let before = self.members.len();
        self.members.extend(users);
        let added = self.members.len() - before;
        if added > 0 {
            self.updated_at = clock.utc();
        }
        added
    }

    /// Marks the team archived. Archiving twice is a no-op.
    pub fn archive(&mut self, clock: &impl Clock) {
        if !self.archived {
            self.archived = true;
            self.updated_at = clock.utc();
        }
    }
}
