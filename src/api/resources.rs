//! Passthrough CRUD wrappers for the catalog resources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{ApiClient, ApiError};
use crate::router::RouteName;

/// The three catalog collections exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Categorias,
    Presentaciones,
    Productos,
}

impl Resource {
    pub const ALL: [Resource; 3] = [
        Resource::Categorias,
        Resource::Presentaciones,
        Resource::Productos,
    ];

    /// Collection path, relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Categorias => "/categorias",
            Resource::Presentaciones => "/presentaciones",
            Resource::Productos => "/productos",
        }
    }

    /// The admin screen that manages this collection.
    pub fn route_name(&self) -> RouteName {
        match self {
            Resource::Categorias => RouteName::Categorias,
            Resource::Presentaciones => RouteName::Presentaciones,
            Resource::Productos => RouteName::Productos,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('/').to_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.to_string() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown resource '{}'; expected categorias, presentaciones or productos",
                    s
                )
            })
    }
}

/// Query parameters understood by the list endpoints. Unset fields are
/// left out of the query string.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Free-text search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentacion_id: Option<i64>,
}

/// CRUD calls for one resource. Each returns the backend body unchanged.
#[derive(Clone, Debug)]
pub struct ResourceApi {
    client: ApiClient,
    resource: Resource,
}

impl ResourceApi {
    pub fn new(client: ApiClient, resource: Resource) -> Self {
        Self { client, resource }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.resource.path(), id)
    }

    pub async fn get_all(&self, params: &ListParams) -> Result<Value, ApiError> {
        self.client.get_with_query(self.resource.path(), params).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Value, ApiError> {
        self.client.get(&self.item_path(id)).await
    }

    pub async fn create(&self, data: &Value) -> Result<Value, ApiError> {
        self.client.post(self.resource.path(), data).await
    }

    pub async fn update(&self, id: i64, data: &Value) -> Result<Value, ApiError> {
        self.client.put(&self.item_path(id), data).await
    }

    pub async fn delete(&self, id: i64) -> Result<Value, ApiError> {
        self.client.delete(&self.item_path(id)).await
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

    fn api(url: &str, resource: Resource) -> ResourceApi {
        let session = SessionHandle::new(Arc::new(MemoryStore::new()));
        let config = ApiConfig {
            base_url: url.to_string(),
            timeout_ms: 2_000,
        };
        ResourceApi::new(ApiClient::new(&config, session).unwrap(), resource)
    }

    #[test]
    fn test_resource_parsing() {
        assert_eq!("productos".parse::<Resource>().unwrap(), Resource::Productos);
        assert_eq!("/Categorias".parse::<Resource>().unwrap(), Resource::Categorias);
        assert!("usuarios".parse::<Resource>().is_err());
    }

    #[tokio::test]
    async fn test_get_all_sends_only_set_params() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/productos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("size".into(), "5".into()),
                Matcher::UrlEncoded("categoria_id".into(), "3".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"items": [], "total": 0, "page": 1, "size": 5}}"#)
            .create_async()
            .await;

        let params = ListParams {
            size: Some(5),
            categoria_id: Some(3),
            ..ListParams::default()
        };
        let body = api(&server.url(), Resource::Productos)
            .get_all(&params)
            .await
            .unwrap();

        m.assert_async().await;
        assert_eq!(body["data"]["size"], 5);
    }

    #[tokio::test]
    async fn test_item_calls_use_id_paths() {
        let mut server = Server::new_async().await;
        let get = server
            .mock("GET", "/categorias/4")
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"id": 4}}"#)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/categorias/4")
            .match_body(Matcher::Json(json!({"nombre": "Bebidas"})))
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/categorias/4")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let categorias = api(&server.url(), Resource::Categorias);
        assert_eq!(categorias.get_by_id(4).await.unwrap()["data"]["id"], 4);
        categorias
            .update(4, &json!({"nombre": "Bebidas"}))
            .await
            .unwrap();
        categorias.delete(4).await.unwrap();

        get.assert_async().await;
        put.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_passes_backend_body_through() {
        let mut server = Server::new_async().await;
        let response = json!({"success": true, "message": "Presentación creada exitosamente", "data": {"id": 10}});
        let _m = server
            .mock("POST", "/presentaciones")
            .with_status(201)
            .with_body(response.to_string())
            .create_async()
            .await;

        let body = api(&server.url(), Resource::Presentaciones)
            .create(&json!({"nombre": "Caja x12"}))
            .await
            .unwrap();
        assert_eq!(body, response);
    }
}
