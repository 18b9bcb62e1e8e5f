//! Thin REST wrappers over [`crate::http::ApiClient`].

pub mod auth;
pub mod resources;

pub use auth::AuthApi;
pub use resources::{ListParams, Resource, ResourceApi};
