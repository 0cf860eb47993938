//! In-memory repository for mirrored users.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{EmailAddress, PersistedUserData, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn upsert(&self, user: &User) -> UserRepositoryResult<()> {
        let mut users = self.users.write().map_err(lock_error)?;
        let merged = match users.get(user.id()) {
            Some(existing) => User::from_persisted(PersistedUserData {
                id: user.id().clone(),
                name: user.name().to_owned(),
                email: user.email().clone(),
                image_url: user.image_url().map(str::to_owned),
                created_at: existing.created_at(),
                updated_at: user.updated_at(),
            }),
            None => user.clone(),
        };
        users.insert(user.id().clone(), merged);
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> UserRepositoryResult<Option<User>> {
        let users = self.users.read().map_err(lock_error)?;
        Ok(users.get(id).cloned())
    }

    async fn find_by_emails(&self, emails: &[EmailAddress]) -> UserRepositoryResult<Vec<User>> {
        let users = self.users.read().map_err(lock_error)?;
        let mut found: Vec<User> = users
            .values()
            .filter(|user| emails.contains(user.email()))
            .cloned()
            .collect();
        found.sort_by(|left, right| left.id().cmp(right.id()));
        Ok(found)
    }
}
