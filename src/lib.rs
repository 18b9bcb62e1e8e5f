//! Library exports for catalog-admin, shared between the binary and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod http;
pub mod models;
pub mod router;
pub mod startup;
pub mod state;
pub mod storage;
pub mod utils;
