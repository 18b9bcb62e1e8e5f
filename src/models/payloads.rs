use serde::{Deserialize, Serialize};

use super::user::UserProfile;

/// The envelope every backend endpoint answers with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Returns the payload only when the backend reported success.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// Email/password pair sent to `/auth/login`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// New account data sent to `/auth/register`. The backend expects the
/// display name under `nombre`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Payload of a successful login or registration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoginData {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Payload of a successful token refresh.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RefreshData {
    pub access_token: String,
}

/// Payload of `/auth/me`. Some backend versions wrap the profile in
/// `{"user": ...}`, others return it bare.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MeData {
    Wrapped { user: UserProfile },
    Bare(UserProfile),
}

impl MeData {
    pub fn into_user(self) -> UserProfile {
        match self {
            MeData::Wrapped { user } => user,
            MeData::Bare(user) => user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failed_envelope_has_no_data() {
        let envelope: ApiEnvelope<LoginData> =
            serde_json::from_value(json!({"success": false, "message": "Credenciales inválidas"}))
                .unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Credenciales inválidas"));
        assert!(envelope.into_data().is_none());
    }

    #[test]
    fn test_me_data_accepts_both_shapes() {
        let wrapped: MeData = serde_json::from_value(json!({"user": {"id": 3}})).unwrap();
        let bare: MeData =
            serde_json::from_value(json!({"id": 3, "email": "a@b.com"})).unwrap();

        assert_eq!(wrapped.into_user().id, json!(3));
        let user = bare.into_user();
        assert_eq!(user.id, json!(3));
        assert_eq!(user.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_registration_uses_backend_field_name() {
        let registration = Registration {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            name: "Ana".to_string(),
        };
        let value = serde_json::to_value(&registration).unwrap();
        assert_eq!(value["nombre"], "Ana");
        assert!(value.get("name").is_none());
    }
}
