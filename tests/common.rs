use std::sync::Arc;

use catalog_admin::config::{ApiConfig, ConfigV1, StorageConfig};
use catalog_admin::startup::build_app;
use catalog_admin::state::AppState;
use serde_json::{json, Value};

pub fn app_with(base_url: &str, storage: StorageConfig) -> AppState {
    let config = ConfigV1 {
        api: ApiConfig {
            base_url: base_url.to_string(),
            timeout_ms: 2_000,
        },
        storage,
        ..Default::default()
    };
    build_app(Arc::new(config)).expect("failed to build app")
}

/// An app talking to `<server>/api` with in-memory credentials.
pub fn app_for(server: &mockito::ServerGuard) -> AppState {
    app_with(&format!("{}/api", server.url()), StorageConfig::Memory)
}

pub fn login_body(access_token: &str, refresh_token: &str) -> String {
    json!({
        "success": true,
        "message": "Login exitoso",
        "data": {
            "user": {"id": 1, "email": "a@b.com", "nombre": "Ana"},
            "access_token": access_token,
            "refresh_token": refresh_token
        }
    })
    .to_string()
}

#[allow(dead_code)]
pub fn envelope(data: Value) -> String {
    json!({"success": true, "data": data}).to_string()
}
