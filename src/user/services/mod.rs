//! Application services for mirrored users.

mod directory;
mod webhook;

pub use directory::{UserDirectoryService, UserSyncError, UserSyncResult};
pub use webhook::{IdentityEmailAddress, IdentityUserData, IdentityWebhookEvent};
