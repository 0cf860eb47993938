//! Repository port for team persistence.

use crate::team::domain::{Team, TeamId};
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for team repository operations.
pub type TeamRepositoryResult<T> = Result<T, TeamRepositoryError>;

/// Team persistence contract.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Stores a new team.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicateTeam`] when the identifier
    /// already exists and [`TeamRepositoryError::UserNotFound`] when a member
    /// is not a stored user.
    async fn store(&self, team: &Team) -> TeamRepositoryResult<()>;

    /// Persists changes to an existing team.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::NotFound`] when the team does not exist
    /// and [`TeamRepositoryError::UserNotFound`] for an unknown member.
    async fn update(&self, team: &Team) -> TeamRepositoryResult<()>;

    /// Finds a team by identifier.
    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>>;

    /// Returns the teams `user` belongs to, ordered by name.
    async fn find_by_member(&self, user: &UserId) -> TeamRepositoryResult<Vec<Team>>;
}

/// Errors returned by team repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TeamRepositoryError {
    /// A team with the same identifier already exists.
    #[error("duplicate team identifier: {0}")]
    DuplicateTeam(TeamId),

    /// The team was not found.
    #[error("team not found: {0}")]
    NotFound(TeamId),

    /// A member does not name a stored user.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TeamRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TeamRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
