//! Domain model for mirrored identity-provider users.

mod email;
mod error;
mod ids;
mod user;

pub use email::EmailAddress;
pub use error::UserDomainError;
pub use ids::UserId;
pub use user::{PersistedUserData, User, UserProfile};
