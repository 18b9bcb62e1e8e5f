//! The HTTP client every API wrapper goes through.
//!
//! Request phase: attach the held access token as a bearer credential.
//! Response phase: a 401 clears the shared session and is handed back to
//! the caller unchanged; this layer never redirects or retries.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ApiError;
use crate::auth::SessionHandle;
use crate::config::ApiConfig;

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionHandle) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Configuration(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                config.base_url
            )));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(default_headers)
            .user_agent(concat!("catalog-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Builds a request, adding `Authorization: Bearer <token>` when an
    /// access token is held. No token means no header, not an error.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match self.session.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Builds a request carrying an explicit bearer credential instead of
    /// the held access token (the refresh call presents the refresh token).
    pub fn request_with_bearer(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client.request(method, self.url(path)).bearer_auth(token)
    }

    /// Sends the request and decodes a 2xx body. Non-2xx responses become
    /// `ApiError`s; a 401 additionally wipes the stored credentials. The
    /// in-memory session is left alone, so a held refresh token stays usable.
    pub async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if status.is_success() {
            debug!("{} answered {}", url, status);
            return Ok(serde_json::from_str(&body)?);
        }

        let error = ApiError::from_response(status, &body);
        if error.is_unauthorized() {
            warn!(
                event_name = "http.unauthorized",
                event_domain = "http",
                path = url.as_str(),
                "backend rejected credentials; clearing stored tokens"
            );
            self.session.clear_storage();
        } else {
            debug!("{} answered {}", url, status);
        }
        Err(error)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, path)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(self.request(Method::DELETE, path)).await
    }
}
