use serde::{Deserialize, Serialize};

use super::user::UserProfile;

/// In-memory authentication state.
///
/// A held access token means requests are authenticated; no tokens at all
/// means the session is anonymous.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Set while a login/registration call is in flight.
    pub loading: bool,
}

impl Session {
    pub fn is_anonymous(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}
