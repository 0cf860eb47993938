//! Application services for teams.

mod teams;

pub use teams::{CreateTeamRequest, TeamService, TeamServiceError, TeamServiceResult};
