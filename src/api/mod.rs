//! HTTP surface: health check and identity-provider webhook.
//!
//! Handlers are thin. They deserialise the request, call the user directory
//! service and map its error to a status code through [`ApiError`].

mod handlers;
mod routes;

pub use handlers::{ApiError, decode_identity_event, health_check, identity_webhook};
pub use routes::router;

#[cfg(test)]
mod tests;
