//! Shared fixtures for the HTTP tests.

use std::sync::Arc;

use crate::test_support::{FixedClock, day};
use crate::user::{
    domain::{EmailAddress, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
    services::UserDirectoryService,
};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
#[error("database unavailable")]
struct Unavailable;

/// User store whose every call fails.
pub(super) struct BrokenUserRepository;

#[async_trait]
impl UserRepository for BrokenUserRepository {
    async fn upsert(&self, _user: &User) -> UserRepositoryResult<()> {
        Err(UserRepositoryError::persistence(Unavailable))
    }

    async fn find_by_id(&self, _id: &UserId) -> UserRepositoryResult<Option<User>> {
        Err(UserRepositoryError::persistence(Unavailable))
    }

    async fn find_by_emails(&self, _emails: &[EmailAddress]) -> UserRepositoryResult<Vec<User>> {
        Err(UserRepositoryError::persistence(Unavailable))
    }
}

pub(super) fn directory<R: UserRepository>(
    repository: R,
) -> Arc<UserDirectoryService<R, FixedClock>> {
    Arc::new(UserDirectoryService::new(
        Arc::new(repository),
        Arc::new(FixedClock::at(day(0))),
    ))
}

/// Well-formed event body for `user_42`.
pub(super) fn grace_event() -> serde_json::Value {
    serde_json::json!({
        "type": "user.created",
        "data": {
            "id": "user_42",
            "email_addresses": [{ "email_address": "grace@example.com" }],
            "first_name": "Grace",
        }
    })
}
