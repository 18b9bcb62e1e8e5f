use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The profile of the authenticated user, as returned by the backend.
///
/// The backend owns this record, so only the fields the client reads are
/// typed; everything else is kept in `extra` and serialized back verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// A short label for logs: the email when known, otherwise the id.
    pub fn display_name(&self) -> String {
        match &self.email {
            Some(email) => email.clone(),
            None => self.id.to_string(),
        }
    }
}
