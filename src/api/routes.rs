//! Route table.

use super::handlers::{health_check, identity_webhook};
use crate::user::{ports::UserRepository, services::UserDirectoryService};
use axum::{
    Router,
    routing::{get, post},
};
use mockable::Clock;
use std::sync::Arc;

/// Builds the application router around the user directory service.
pub fn router<R, C>(directory: Arc<UserDirectoryService<R, C>>) -> Router
where
    R: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/webhooks/identity", post(identity_webhook::<R, C>))
        .with_state(directory)
}
