//! Mirrored user aggregate.

use super::{EmailAddress, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Display name used when the identity provider omits a first name.
const UNKNOWN_FIRST_NAME: &str = "Unknown";

/// Profile fields supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    id: UserId,
    name: String,
    email: EmailAddress,
    image_url: Option<String>,
}

impl UserProfile {
    /// Creates a profile from provider name parts.
    ///
    /// The display name is `"{first} {last}"` trimmed; a missing or blank
    /// first name falls back to `Unknown`.
    #[must_use]
    pub fn new(
        id: UserId,
        email: EmailAddress,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Self {
        let first = first_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_FIRST_NAME);
        let last = last_name.map(str::trim).unwrap_or_default();
        let name = format!("{first} {last}").trim().to_owned();

        Self {
            id,
            name,
            email,
            image_url: None,
        }
    }

    /// Sets the avatar URL. Blank values are ignored.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        let url = image_url.into();
        let trimmed = url.trim();
        self.image_url = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Returns the subject identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Locally mirrored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: EmailAddress,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Subject identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: EmailAddress,
    /// Avatar URL, if any.
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a user from a provider profile.
    #[must_use]
    pub fn from_profile(profile: UserProfile, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            image_url: profile.image_url,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            image_url: data.image_url,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Overwrites the mutable profile fields, keeping identity and creation
    /// time.
    pub fn apply_profile(&mut self, profile: UserProfile, clock: &impl Clock) {
        self.name = profile.name;
        self.email = profile.email;
        self.image_url = profile.image_url;
        self.updated_at = clock.utc();
    }

    /// Returns the subject identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the avatar URL, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
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
}
