//! Shared application state.
//!
//! Everything hangs off one [`SessionHandle`]: the HTTP client reads tokens
//! from it, the auth store mutates it and the router guard consults it.

use std::sync::Arc;

use crate::api::{AuthApi, Resource, ResourceApi};
use crate::auth::AuthStore;
use crate::config::ConfigV1;
use crate::http::ApiClient;
use crate::router::Router;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    pub client: ApiClient,
    /// Session lifecycle; shares its session with `client`.
    pub auth: AuthStore,
    /// Direct access to the auth endpoints, for calls the store does not
    /// wrap (server-side logout).
    pub auth_api: AuthApi,
    pub router: Router,
}

impl AppState {
    pub fn resource(&self, resource: Resource) -> ResourceApi {
        ResourceApi::new(self.client.clone(), resource)
    }
}
