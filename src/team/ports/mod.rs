//! Port contracts for teams.

pub mod repository;

pub use repository::{TeamRepository, TeamRepositoryError, TeamRepositoryResult};
