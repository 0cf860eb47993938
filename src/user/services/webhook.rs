//! Identity-provider webhook payload.
//!
//! Only the fields needed to mirror a user are modelled; everything else in
//! the provider's event body is ignored during deserialisation.

use serde::Deserialize;

/// Envelope posted by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdentityWebhookEvent {
    /// User payload; absent for events that do not describe a user.
    #[serde(default)]
    pub data: Option<IdentityUserData>,
}

/// User fields carried by an identity webhook event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdentityUserData {
    /// Provider subject identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Email addresses; the first entry is treated as primary.
    #[serde(default)]
    pub email_addresses: Vec<IdentityEmailAddress>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Single email entry in an identity webhook event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdentityEmailAddress {
    /// The address itself.
    #[serde(default)]
    pub email_address: Option<String>,
}

impl IdentityUserData {
    /// Returns the primary (first) email address, if present and non-blank.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .first()
            .and_then(|entry| entry.email_address.as_deref())
            .map(str::trim)
            .filter(|address| !address.is_empty())
    }
}
