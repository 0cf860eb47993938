//! `PostgreSQL` repository implementation for mirrored users.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::user::{
    domain::{EmailAddress, PersistedUserData, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::upsert::excluded;

/// `PostgreSQL` connection pool type used by user adapters.
pub type UserPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: UserPgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: UserPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn upsert(&self, user: &User) -> UserRepositoryResult<()> {
        let row = NewUserRow {
            id: user.id().as_str().to_owned(),
            name: user.name().to_owned(),
            email: user.email().as_str().to_owned(),
            image_url: user.image_url().map(str::to_owned),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .on_conflict(users::id)
                .do_update()
                .set((
                    users::name.eq(excluded(users::name)),
                    users::email.eq(excluded(users::email)),
                    users::image_url.eq(excluded(users::image_url)),
                    users::updated_at.eq(excluded(users::updated_at)),
                ))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: &UserId) -> UserRepositoryResult<Option<User>> {
        let lookup = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_emails(&self, emails: &[EmailAddress]) -> UserRepositoryResult<Vec<User>> {
        let lookup: Vec<String> = emails.iter().map(|email| email.as_str().to_owned()).collect();
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::email.eq_any(lookup))
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        name,
        email,
        image_url,
        created_at,
        updated_at,
    } = row;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::new(id).map_err(UserRepositoryError::persistence)?,
        name,
        email: EmailAddress::new(email).map_err(UserRepositoryError::persistence)?,
        image_url,
        created_at,
        updated_at,
    }))
}
