//! Wrappers for the `/auth/*` endpoints.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::auth::AuthBackend;
use crate::http::{ApiClient, ApiError};
use crate::models::{ApiEnvelope, Credentials, LoginData, MeData, RefreshData, Registration};

#[derive(Clone, Debug)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthBackend for AuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<ApiEnvelope<LoginData>, ApiError> {
        self.client.post("/auth/login", credentials).await
    }

    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<ApiEnvelope<LoginData>, ApiError> {
        self.client.post("/auth/register", registration).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ApiEnvelope<RefreshData>, ApiError> {
        let request = self
            .client
            .request_with_bearer(Method::POST, "/auth/refresh", refresh_token);
        self.client.execute(request).await
    }

    async fn me(&self) -> Result<ApiEnvelope<MeData>, ApiError> {
        self.client.get("/auth/me").await
    }

    async fn logout(&self) -> Result<ApiEnvelope<Value>, ApiError> {
        self.client.post_empty("/auth/logout").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionHandle;
    use crate::config::ApiConfig;
    use crate::storage::MemoryStore;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::Arc;

    fn auth_api(url: &str) -> AuthApi {
        let session = SessionHandle::new(Arc::new(MemoryStore::new()));
        let config = ApiConfig {
            base_url: url.to_string(),
            timeout_ms: 2_000,
        };
        AuthApi::new(ApiClient::new(&config, session).unwrap())
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(json!({"email": "a@b.com", "password": "x"})))
            .with_status(200)
            .with_body(
                json!({
                    "success": true,
                    "data": {"user": {"id": 1}, "access_token": "AT1", "refresh_token": "RT1"}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let api = auth_api(&server.url());
        let envelope = api.login(&Credentials::new("a@b.com", "x")).await.unwrap();

        m.assert_async().await;
        let data = envelope.into_data().expect("login data");
        assert_eq!(data.access_token, "AT1");
        assert_eq!(data.refresh_token, "RT1");
    }

    #[tokio::test]
    async fn test_refresh_presents_refresh_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/refresh")
            .match_header("authorization", "Bearer RT1")
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"access_token": "AT2"}}"#)
            .create_async()
            .await;

        let api = auth_api(&server.url());
        let envelope = api.refresh("RT1").await.unwrap();

        m.assert_async().await;
        assert_eq!(envelope.into_data().unwrap().access_token, "AT2");
    }

    #[tokio::test]
    async fn test_me_accepts_bare_profile() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/auth/me")
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"id": 4, "email": "c@d.com"}}"#)
            .create_async()
            .await;

        let api = auth_api(&server.url());
        let user = api.me().await.unwrap().into_data().unwrap().into_user();
        assert_eq!(user.id, json!(4));
    }

    #[tokio::test]
    async fn test_logout_posts_without_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/logout")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let api = auth_api(&server.url());
        assert!(api.logout().await.unwrap().success);
        m.assert_async().await;
    }
}
