use async_trait::async_trait;
use serde_json::Value;

use crate::http::ApiError;
use crate::models::{ApiEnvelope, Credentials, LoginData, MeData, RefreshData, Registration};

/// The backend authentication endpoints the session store depends on.
///
/// `api::AuthApi` is the HTTP implementation; tests substitute stubs.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<ApiEnvelope<LoginData>, ApiError>;

    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<ApiEnvelope<LoginData>, ApiError>;

    /// Exchanges the refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<ApiEnvelope<RefreshData>, ApiError>;

    /// Who am I.
    async fn me(&self) -> Result<ApiEnvelope<MeData>, ApiError>;

    /// Invalidates the session server-side.
    async fn logout(&self) -> Result<ApiEnvelope<Value>, ApiError>;
}
