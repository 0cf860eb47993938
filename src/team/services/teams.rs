//! Service layer for team creation and membership.

use crate::task::{
    domain::{Tag, TagColor, TagName, TaskDomainError},
    ports::{TagRepository, TaskRepositoryError},
};
use crate::team::{
    domain::{Team, TeamDomainError, TeamId, TeamName},
    ports::{TeamRepository, TeamRepositoryError},
};
use crate::user::domain::UserId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamRequest {
    name: String,
    description: Option<String>,
    members: Vec<UserId>,
    tags: Vec<String>,
}

impl CreateTeamRequest {
    /// Creates a request with the team name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial members besides the creating actor.
    #[must_use]
    pub fn with_members(mut self, members: impl IntoIterator<Item = UserId>) -> Self {
        self.members = members.into_iter().collect();
        self
    }

    /// Sets tag names; unknown tags are created with the default color.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

/// Service-level errors for team operations.
#[derive(Debug, Error)]
pub enum TeamServiceError {
    /// Team validation failed.
    #[error(transparent)]
    Domain(#[from] TeamDomainError),
    /// Tag validation failed.
    #[error(transparent)]
    Tag(#[from] TaskDomainError),
    /// Team repository operation failed.
    #[error(transparent)]
    Repository(#[from] TeamRepositoryError),
    /// Tag repository operation failed.
    #[error(transparent)]
    TagRepository(#[from] TaskRepositoryError),
    /// The actor is not a member of the team.
    #[error("user {actor} is not a member of team {team_id}")]
    NotAMember {
        /// Acting user.
        actor: UserId,
        /// Target team.
        team_id: TeamId,
    },
}

/// Result type for team service operations.
pub type TeamServiceResult<T> = Result<T, TeamServiceError>;

/// Team orchestration service.
#[derive(Clone)]
pub struct TeamService<R, T, C>
where
    R: TeamRepository,
    T: TagRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    tags: Arc<T>,
    clock: Arc<C>,
}

impl<R, T, C> TeamService<R, T, C>
where
    R: TeamRepository,
    T: TagRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new team service.
    #[must_use]
    pub const fn new(repository: Arc<R>, tags: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            repository,
            tags,
            clock,
        }
    }

    /// Creates a team; the actor always becomes a member.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError`] when the name or a tag is invalid, or a
    /// repository rejects persistence.
    pub async fn create_team(
        &self,
        actor: &UserId,
        request: CreateTeamRequest,
    ) -> TeamServiceResult<Team> {
        let CreateTeamRequest {
            name,
            description,
            members,
            tags,
        } = request;

        let team_name = TeamName::new(name)?;
        let tag_names = tags
            .into_iter()
            .map(TagName::new)
            .collect::<Result<Vec<_>, _>>()?;
        for tag_name in &tag_names {
            let tag = Tag::new(tag_name.clone(), TagColor::default(), &*self.clock);
            self.tags.upsert_tag(&tag).await?;
        }

        let mut team = Team::new(
            team_name,
            members.into_iter().chain(std::iter::once(actor.clone())),
            &*self.clock,
        )
        .with_tags(tag_names);
        if let Some(text) = description {
            team = team.with_description(text);
        }

        self.repository.store(&team).await?;
        info!(team_id = %team.id(), actor = %actor, "created team");
        Ok(team)
    }

    /// Retrieves a team by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::NotFound`] when the team does not exist.
    pub async fn get_team(&self, id: TeamId) -> TeamServiceResult<Team> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TeamServiceError::Repository(TeamRepositoryError::NotFound(id)))
    }

    /// Lists the teams a user belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Repository`] when the lookup fails.
    pub async fn teams_for(&self, user: &UserId) -> TeamServiceResult<Vec<Team>> {
        Ok(self.repository.find_by_member(user).await?)
    }

    /// Adds members to a team the actor belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::NotAMember`] when the actor is outside the
    /// team, or a repository error.
    pub async fn add_members(
        &self,
        actor: &UserId,
        id: TeamId,
        users: impl IntoIterator<Item = UserId> + Send,
    ) -> TeamServiceResult<Team> {
        let mut team = self.member_team(actor, id).await?;
        if team.add_members(users, &*self.clock) > 0 {
            self.repository.update(&team).await?;
        }
        Ok(team)
    }

    /// Archives a team the actor belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::NotAMember`] when the actor is outside the
    /// team, or a repository error.
    pub async fn archive_team(&self, actor: &UserId, id: TeamId) -> TeamServiceResult<Team> {
        let mut team = self.member_team(actor, id).await?;
        if !team.is_archived() {
            team.archive(&*self.clock);
            self.repository.update(&team).await?;
            info!(team_id = %id, actor = %actor, "archived team");
        }
        Ok(team)
    }

    async fn member_team(&self, actor: &UserId, id: TeamId) -> TeamServiceResult<Team> {
        let team = self.get_team(id).await?;
        if !team.has_member(actor) {
            return Err(TeamServiceError::NotAMember {
                actor: actor.clone(),
                team_id: id,
            });
        }
        Ok(team)
    }
}
