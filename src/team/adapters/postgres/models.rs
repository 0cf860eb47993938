//! Diesel row models for team persistence.

use super::schema::{team_members, team_tags, teams};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Team row, used for both reads and writes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TeamRow {
    /// Team identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Archived flag.
    pub archived: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Membership link row.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = team_members)]
pub struct TeamMemberRow {
    /// Team.
    pub team_id: Uuid,
    /// Member user.
    pub user_id: String,
}

/// Tag link row.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = team_tags)]
pub struct TeamTagRow {
    /// Team.
    pub team_id: Uuid,
    /// Tag name.
    pub tag_name: String,
}
