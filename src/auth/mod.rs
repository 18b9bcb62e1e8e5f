pub mod backend;
pub mod session;
pub mod store;

// Re-export so we can do "use crate::auth::*;"
pub use backend::AuthBackend;
pub use session::SessionHandle;
pub use store::{AuthOutcome, AuthStore, CONNECTION_ERROR_MESSAGE};
