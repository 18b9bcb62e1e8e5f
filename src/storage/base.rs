use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::{file_store::FileStore, memory_store::MemoryStore};
use crate::config::StorageConfig;

/// Storage key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("credential file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("no default data directory available; set storage.path explicitly")]
    NoDataDir,
}

/// Client-local key-value storage for credentials.
///
/// Reads never fail: an unreadable entry is reported as absent.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    /// Whether entries survive a restart.
    fn is_persistent(&self) -> bool {
        true
    }
}

/// Creates the credential store selected by the config.
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn CredentialStore>, StorageError> {
    match config {
        StorageConfig::File { path } => {
            let path = match path {
                Some(p) => p.clone(),
                None => FileStore::default_path()?,
            };
            info!("Using file credential store at '{}'", path.display());
            Ok(Arc::new(FileStore::open(path)?))
        }
        StorageConfig::Memory => {
            debug!("Using in-memory credential store; tokens will not survive a restart.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
