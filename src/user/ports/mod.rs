//! Port contracts for mirrored users.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
