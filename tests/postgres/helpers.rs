//! Shared test helpers for `PostgreSQL` integration tests.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use taskboard::task::adapters::postgres::PostgresTaskRepository;
use taskboard::team::adapters::postgres::PostgresTeamRepository;
use taskboard::user::{
    adapters::postgres::PostgresUserRepository,
    domain::{EmailAddress, User, UserId, UserProfile},
    ports::UserRepository,
};
use uuid::Uuid;

/// Boxed error used by fallible helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming an administrative connection URL.
pub const DATABASE_URL_VAR: &str = "TASKBOARD_TEST_DATABASE_URL";

/// SQL creating the schema.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2025-03-01-000000_create_taskboard_tables/up.sql");

/// Database created for one test and dropped with it.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Creates a uniquely named database and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or the schema fails.
    pub fn create(admin_url: &str) -> Result<Self, BoxError> {
        let name = format!("taskboard_test_{}", Uuid::new_v4().simple());
        let (server, _) = admin_url
            .rsplit_once('/')
            .ok_or("database URL has no database path")?;
        let url = format!("{server}/{name}");

        let mut admin = PgConnection::establish(admin_url)?;
        admin.batch_execute(&format!("CREATE DATABASE {name}"))?;
        let database = Self {
            admin_url: admin_url.to_owned(),
            name,
            url,
        };

        let mut connection = PgConnection::establish(&database.url)?;
        connection.batch_execute(CREATE_SCHEMA_SQL)?;
        Ok(database)
    }

    /// Connection URL of the temporary database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        if let Ok(mut admin) = PgConnection::establish(&self.admin_url) {
            let statement = format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.name);
            if let Err(err) = admin.batch_execute(&statement) {
                tracing::warn!(database = %self.name, error = %err, "failed to drop test database");
            }
        }
    }
}

/// Repositories over one temporary database.
pub struct PgContext {
    pub tasks: Arc<PostgresTaskRepository>,
    pub users: Arc<PostgresUserRepository>,
    pub teams: Arc<PostgresTeamRepository>,
    _database: TemporaryDatabase,
}

/// Builds a context over a fresh database.
///
/// # Errors
///
/// Returns an error if [`DATABASE_URL_VAR`] is unset, or if database
/// creation or pool setup fails.
pub fn context() -> Result<PgContext, BoxError> {
    let admin_url = std::env::var(DATABASE_URL_VAR)
        .map_err(|err| format!("{DATABASE_URL_VAR} must name a PostgreSQL server: {err}"))?;
    let database = TemporaryDatabase::create(&admin_url)?;
    let pool = Pool::builder()
        .max_size(2)
        .build(ConnectionManager::<PgConnection>::new(database.url()))?;
    Ok(PgContext {
        tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        teams: Arc::new(PostgresTeamRepository::new(pool)),
        _database: database,
    })
}

/// Mirrors a user so tasks can reference it.
///
/// # Errors
///
/// Returns an error if the identifier or email is invalid or the upsert
/// fails.
pub async fn seed_user(context: &PgContext, id: &str) -> Result<UserId, BoxError> {
    let user_id = UserId::new(id)?;
    let profile = UserProfile::new(
        user_id.clone(),
        EmailAddress::new(format!("{id}@example.com"))?,
        Some(id),
        None,
    );
    context
        .users
        .upsert(&User::from_profile(profile, &DefaultClock))
        .await?;
    Ok(user_id)
}
