//! `PostgreSQL` repository implementation for teams.

use super::{
    models::{TeamMemberRow, TeamRow, TeamTagRow},
    schema::{team_members, team_tags, teams},
};
use crate::task::domain::TagName;
use crate::team::{
    domain::{PersistedTeamData, Team, TeamId, TeamName},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by team adapters.
pub type TeamPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed team repository.
///
/// Members and tags live in link tables rewritten in the same transaction
/// as the team row. Tags must already exist in `tags`.
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: TeamPgPool,
}

impl PostgresTeamRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TeamPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TeamRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TeamRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TeamRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TeamRepositoryError::persistence)?
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn store(&self, team: &Team) -> TeamRepositoryResult<()> {
        let team_id = team.id();
        let row = to_team_row(team);
        let links = TeamLinks::from_team(team);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TeamRepositoryError, _>(|tx| {
                diesel::insert_into(teams::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TeamRepositoryError::DuplicateTeam(team_id)
                        }
                        _ => TeamRepositoryError::persistence(err),
                    })?;
                links.insert(tx)
            })
        })
        .await
    }

    async fn update(&self, team: &Team) -> TeamRepositoryResult<()> {
        let team_id = team.id();
        let row = to_team_row(team);
        let links = TeamLinks::from_team(team);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TeamRepositoryError, _>(|tx| {
                let updated = diesel::update(teams::table.find(team_id.into_inner()))
                    .set(&row)
                    .execute(tx)
                    .map_err(TeamRepositoryError::persistence)?;
                if updated == 0 {
                    return Err(TeamRepositoryError::NotFound(team_id));
                }
                TeamLinks::clear(tx, team_id.into_inner())?;
                links.insert(tx)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>> {
        self.run_blocking(move |connection| {
            let row = teams::table
                .find(id.into_inner())
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()
                .map_err(TeamRepositoryError::persistence)?;
            let Some(found) = row else {
                return Ok(None);
            };
            let mut hydrated = hydrate_teams(connection, vec![found])?;
            Ok(hydrated.pop())
        })
        .await
    }

    async fn find_by_member(&self, user: &UserId) -> TeamRepositoryResult<Vec<Team>> {
        let member = user.as_str().to_owned();
        self.run_blocking(move |connection| {
            let member_of = team_members::table
                .filter(team_members::user_id.eq(member))
                .select(team_members::team_id);
            let rows = teams::table
                .filter(teams::id.eq_any(member_of))
                .order((teams::name.asc(), teams::id.asc()))
                .select(TeamRow::as_select())
                .load::<TeamRow>(connection)
                .map_err(TeamRepositoryError::persistence)?;
            hydrate_teams(connection, rows)
        })
        .await
    }
}

/// Link-table rows for one team.
struct TeamLinks {
    team_id: Uuid,
    users: Vec<UserId>,
    members: Vec<TeamMemberRow>,
    tags: Vec<TeamTagRow>,
}

impl TeamLinks {
    fn from_team(team: &Team) -> Self {
        let team_id = team.id().into_inner();
        Self {
            team_id,
            users: team.members().iter().cloned().collect(),
            members: team
                .members()
                .iter()
                .map(|user| TeamMemberRow {
                    team_id,
                    user_id: user.as_str().to_owned(),
                })
                .collect(),
            tags: team
                .tags()
                .iter()
                .map(|tag| TeamTagRow {
                    team_id,
                    tag_name: tag.as_str().to_owned(),
                })
                .collect(),
        }
    }

    fn clear(connection: &mut PgConnection, team_id: Uuid) -> TeamRepositoryResult<()> {
        diesel::delete(team_members::table.filter(team_members::team_id.eq(team_id)))
            .execute(connection)
            .map_err(TeamRepositoryError::persistence)?;
        diesel::delete(team_tags::table.filter(team_tags::team_id.eq(team_id)))
            .execute(connection)
            .map_err(TeamRepositoryError::persistence)?;
        Ok(())
    }

    fn insert(&self, connection: &mut PgConnection) -> TeamRepositoryResult<()> {
        if !self.members.is_empty() {
            diesel::insert_into(team_members::table)
                .values(&self.members)
                .execute(connection)
                .map_err(|err| self.member_violation(err))?;
        }
        if !self.tags.is_empty() {
            diesel::insert_into(team_tags::table)
                .values(&self.tags)
                .execute(connection)
                .map_err(TeamRepositoryError::persistence)?;
        }
        Ok(())
    }

    /// Names the missing member from the violation detail.
    fn member_violation(&self, err: DieselError) -> TeamRepositoryError {
        let missing = match &err {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)
                if info.constraint_name() == Some("team_members_user_id_fkey") =>
            {
                let detail = info.details().unwrap_or_default();
                self.users
                    .iter()
                    .find(|user| detail.contains(&format!("=({})", user.as_str())))
                    .or_else(|| self.users.first())
                    .cloned()
            }
            _ => None,
        };
        missing.map_or_else(
            || TeamRepositoryError::persistence(err),
            TeamRepositoryError::UserNotFound,
        )
    }
}

fn hydrate_teams(
    connection: &mut PgConnection,
    rows: Vec<TeamRow>,
) -> TeamRepositoryResult<Vec<Team>> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let mut members: HashMap<Uuid, BTreeSet<UserId>> = HashMap::new();
    for link in team_members::table
        .filter(team_members::team_id.eq_any(&ids))
        .load::<TeamMemberRow>(connection)
        .map_err(TeamRepositoryError::persistence)?
    {
        let user = UserId::new(link.user_id).map_err(TeamRepositoryError::persistence)?;
        members.entry(link.team_id).or_default().insert(user);
    }

    let mut tags: HashMap<Uuid, BTreeSet<TagName>> = HashMap::new();
    for link in team_tags::table
        .filter(team_tags::team_id.eq_any(&ids))
        .load::<TeamTagRow>(connection)
        .map_err(TeamRepositoryError::persistence)?
    {
        let name = TagName::new(link.tag_name).map_err(TeamRepositoryError::persistence)?;
        tags.entry(link.team_id).or_default().insert(name);
    }

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            row_to_team(
                row,
                members.remove(&id).unwrap_or_default(),
                tags.remove(&id).unwrap_or_default(),
            )
        })
        .collect()
}

fn to_team_row(team: &Team) -> TeamRow {
    TeamRow {
        id: team.id().into_inner(),
        name: team.name().as_str().to_owned(),
        description: team.description().map(str::to_owned),
        archived: team.is_archived(),
        created_at: team.created_at(),
        updated_at: team.updated_at(),
    }
}

fn row_to_team(
    row: TeamRow,
    members: BTreeSet<UserId>,
    tags: BTreeSet<TagName>,
) -> TeamRepositoryResult<Team> {
    Ok(Team::from_persisted(PersistedTeamData {
        id: TeamId::from_uuid(row.id),
        name: TeamName::new(row.name).map_err(TeamRepositoryError::persistence)?,
        description: row.description,
        members,
        tags,
        archived: row.archived,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
