//! Locally mirrored users from the external identity provider.
//!
//! Users are never registered in-app. The identity provider notifies the
//! service through a webhook whenever a user is created or changes their
//! profile, and the local record is upserted keyed by the provider's subject
//! identifier. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
