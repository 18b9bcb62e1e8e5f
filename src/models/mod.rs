pub mod payloads;
pub mod session;
pub mod user;

// Re-export so callers can do "use crate::models::*;"
pub use payloads::*;
pub use session::Session;
pub use user::UserProfile;
