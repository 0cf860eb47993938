//! Service layer for mirroring identity-provider users.

use super::webhook::IdentityWebhookEvent;
use crate::user::{
    domain::{EmailAddress, User, UserDomainError, UserId, UserProfile},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned while synchronising users.
#[derive(Debug, Error)]
pub enum UserSyncError {
    /// The event carried no user payload.
    #[error("webhook event has no user data")]
    MissingData,
    /// The user payload has no primary email address.
    #[error("webhook user has no email address")]
    MissingEmail,
    /// The user payload has no subject identifier.
    #[error("webhook user has no identifier")]
    MissingId,
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

impl UserSyncError {
    /// Returns `true` when the failure is caused by the caller's payload
    /// rather than by the store.
    #[must_use]
    pub const fn is_invalid_payload(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }
}

/// Result type for user synchronisation.
pub type UserSyncResult<T> = Result<T, UserSyncError>;

/// Mirrors identity-provider users into the local store.
#[derive(Clone)]
pub struct UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Upserts the user described by an identity webhook event.
    ///
    /// The creation timestamp of an existing user is preserved; profile
    /// fields are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`UserSyncError::MissingData`], [`UserSyncError::MissingEmail`]
    /// or [`UserSyncError::MissingId`] for incomplete payloads,
    /// [`UserSyncError::Domain`] for malformed values, and
    /// [`UserSyncError::Repository`] when persistence fails.
    pub async fn sync_from_webhook(&self, event: IdentityWebhookEvent) -> UserSyncResult<User> {
        let data = event.data.ok_or(UserSyncError::MissingData)?;
        let raw_email = data.primary_email().ok_or(UserSyncError::MissingEmail)?;
        let email = EmailAddress::new(raw_email)?;
        let raw_id = data.id.as_deref().ok_or(UserSyncError::MissingId)?;
        let id = UserId::new(raw_id)?;

        let mut profile = UserProfile::new(
            id,
            email,
            data.first_name.as_deref(),
            data.last_name.as_deref(),
        );
        if let Some(image_url) = data.image_url {
            profile = profile.with_image_url(image_url);
        }

        let user = match self.repository.find_by_id(profile.id()).await? {
            Some(mut existing) => {
                existing.apply_profile(profile, &*self.clock);
                existing
            }
            None => User::from_profile(profile, &*self.clock),
        };

        self.repository.upsert(&user).await.inspect_err(|err| {
            warn!(user_id = %user.id(), error = %err, "failed to upsert mirrored user");
        })?;
        info!(user_id = %user.id(), "mirrored user from identity webhook");
        Ok(user)
    }

    /// Finds a mirrored user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserSyncError::Repository`] when the lookup fails.
    pub async fn find(&self, id: &UserId) -> UserSyncResult<Option<User>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Resolves email addresses to user identifiers, skipping unknown
    /// addresses.
    ///
    /// # Errors
    ///
    /// Returns [`UserSyncError::Domain`] for malformed addresses and
    /// [`UserSyncError::Repository`] when the lookup fails.
    pub async fn resolve_emails<I, S>(&self, emails: I) -> UserSyncResult<Vec<UserId>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let addresses = emails
            .into_iter()
            .map(EmailAddress::new)
            .collect::<Result<Vec<_>, _>>()?;
        if addresses.is_empty() {
            return Ok(Vec::new());
        }
        let users = self.repository.find_by_emails(&addresses).await?;
        Ok(users.into_iter().map(|user| user.id().clone()).collect())
    }
}
