//! In-memory repository for teams.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::team::{
    domain::{Team, TeamId},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};
use crate::user::domain::UserId;

/// Thread-safe in-memory team repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamRepository {
    teams: Arc<RwLock<HashMap<TeamId, Team>>>,
}

impl InMemoryTeamRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TeamRepositoryError {
    TeamRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn store(&self, team: &Team) -> TeamRepositoryResult<()> {
        let mut teams = self.teams.write().map_err(lock_error)?;
        if teams.contains_key(&team.id()) {
            return Err(TeamRepositoryError::DuplicateTeam(team.id()));
        }
        teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn update(&self, team: &Team) -> TeamRepositoryResult<()> {
        let mut teams = self.teams.write().map_err(lock_error)?;
        let slot = teams
            .get_mut(&team.id())
            .ok_or(TeamRepositoryError::NotFound(team.id()))?;
        *slot = team.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>> {
        let teams = self.teams.read().map_err(lock_error)?;
        Ok(teams.get(&id).cloned())
    }

    async fn find_by_member(&self, user: &UserId) -> TeamRepositoryResult<Vec<Team>> {
        let teams = self.teams.read().map_err(lock_error)?;
        let mut found: Vec<Team> = teams
            .values()
            .filter(|team| team.has_member(user))
            .cloned()
            .collect();
        found.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(found)
    }
}
