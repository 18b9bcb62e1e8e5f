//! Application startup: wires storage, session, HTTP client, auth store and
//! router together.

use std::sync::Arc;

use tracing::info;

use crate::api::AuthApi;
use crate::auth::{AuthStore, SessionHandle};
use crate::config::ConfigV1;
use crate::http::ApiClient;
use crate::router::Router;
use crate::state::AppState;
use crate::storage::create_store;

/// Builds the application state from a loaded configuration.
///
/// # Errors
///
/// Returns an error if the credential store cannot be opened or the API
/// base URL is invalid.
pub fn build_app(config: Arc<ConfigV1>) -> Result<AppState, Box<dyn std::error::Error>> {
    let storage = create_store(&config.storage)?;
    let session = SessionHandle::new(storage);

    let client = ApiClient::new(&config.api, session.clone())?;
    info!("Using backend at {}", client.base_url());

    let auth_api = AuthApi::new(client.clone());
    let auth = AuthStore::new(session, Arc::new(auth_api.clone()));
    let router = Router::new(auth.clone());

    Ok(AppState {
        config,
        client,
        auth,
        auth_api,
        router,
    })
}
