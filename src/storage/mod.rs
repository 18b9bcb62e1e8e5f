pub mod base;
pub mod file_store;
pub mod memory_store;

// Re-export the primary storage items so code outside can do
// "use crate::storage::{CredentialStore, create_store};"
pub use base::{create_store, CredentialStore, StorageError, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
