//! Repository port for mirrored user persistence.

use crate::user::domain::{EmailAddress, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user, or overwrites name, email, avatar and update
    /// timestamp when the identifier already exists.
    async fn upsert(&self, user: &User) -> UserRepositoryResult<()>;

    /// Finds a user by subject identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_by_id(&self, id: &UserId) -> UserRepositoryResult<Option<User>>;

    /// Returns every user whose email matches one of `emails`.
    ///
    /// Unknown addresses are skipped rather than reported.
    async fn find_by_emails(&self, emails: &[EmailAddress]) -> UserRepositoryResult<Vec<User>>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
