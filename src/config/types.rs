use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::storage::StorageConfig;

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "./catalog-admin.yaml";
/// Prefix of the environment variables that override the config file.
pub const ENV_PREFIX: &str = "CATALOG_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: backend API, credential storage and logging.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the backend lives and how long a single call may take.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Transport timeout for a single request, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://192.168.0.105:5000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Builds the layered figment: defaults, then the YAML file (if present),
/// then `CATALOG_*` environment variables (`__` separates nested keys).
pub fn figment(path: Option<&Path>) -> Figment {
    let file = match path {
        Some(p) => Yaml::file(p),
        None => Yaml::file(DEFAULT_CONFIG_FILE),
    };
    Figment::from(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
        .merge(file)
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Loads the configuration, failing on malformed files or values.
pub fn load_config(path: Option<&Path>) -> Result<ConfigV1, figment::Error> {
    extract(figment(path))
}

/// Extracts a `ConfigV1` out of an already layered figment.
pub fn extract(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Render the JSON schema for the configuration.
pub fn schema_json() -> Result<String, serde_json::Error> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}
