//! The shared, owned session state.
//!
//! One `SessionHandle` is created at startup and cloned into every
//! component that reads or mutates credentials. Every token mutation is
//! mirrored to the credential store before the call returns.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::models::{Session, UserProfile};
use crate::storage::{CredentialStore, StorageError, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<Session>>,
    storage: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("authenticated", &self.access_token().is_some())
            .field("persistent", &self.storage.is_persistent())
            .finish()
    }
}

impl SessionHandle {
    /// An empty session over the given storage. Nothing is read from
    /// storage here; hydration is explicit.
    pub fn new(storage: Arc<dyn CredentialStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Session::default())),
            storage,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn storage(&self) -> &Arc<dyn CredentialStore> {
        &self.storage
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// The access token held in memory, falling back to durable storage.
    pub fn access_token(&self) -> Option<String> {
        self.read()
            .access_token
            .clone()
            .or_else(|| self.storage.get(ACCESS_TOKEN_KEY))
    }

    pub fn memory_access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    /// Both stored tokens, only when both are present.
    pub fn stored_tokens(&self) -> Option<(String, String)> {
        let access = self.storage.get(ACCESS_TOKEN_KEY)?;
        let refresh = self.storage.get(REFRESH_TOKEN_KEY)?;
        Some((access, refresh))
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().user.clone()
    }

    pub fn set_user(&self, user: UserProfile) {
        self.write().user = Some(user);
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().loading = loading;
    }

    /// Hydrates the in-memory tokens from values read out of storage.
    pub fn hydrate(&self, access_token: String, refresh_token: String) {
        let mut state = self.write();
        state.access_token = Some(access_token);
        state.refresh_token = Some(refresh_token);
    }

    /// Stores a fresh login: profile plus both tokens, in memory and on disk.
    pub fn establish(&self, user: UserProfile, access_token: String, refresh_token: String) {
        {
            let mut state = self.write();
            state.user = Some(user);
            state.access_token = Some(access_token.clone());
            state.refresh_token = Some(refresh_token.clone());
        }
        self.persist(ACCESS_TOKEN_KEY, &access_token);
        self.persist(REFRESH_TOKEN_KEY, &refresh_token);
    }

    /// Swaps in a refreshed access token. The held refresh token is written
    /// back as well, so storage emptied by an earlier 401 holds a complete
    /// pair again.
    pub fn replace_access_token(&self, access_token: String) {
        let refresh_token = {
            let mut state = self.write();
            state.access_token = Some(access_token.clone());
            state.refresh_token.clone()
        };
        self.persist(ACCESS_TOKEN_KEY, &access_token);
        if let Some(refresh_token) = refresh_token {
            self.persist(REFRESH_TOKEN_KEY, &refresh_token);
        }
    }

    /// Drops the profile and both tokens, in memory and on disk.
    pub fn clear(&self) {
        {
            let mut state = self.write();
            state.user = None;
            state.access_token = None;
            state.refresh_token = None;
        }
        self.clear_storage();
    }

    /// Removes both durable token entries, leaving memory untouched.
    pub fn clear_storage(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key) {
                log_storage_error("remove", key, &e);
            }
        }
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            log_storage_error("write", key, &e);
        }
    }
}

fn log_storage_error(action: &str, key: &str, error: &StorageError) {
    warn!(
        event_name = "session.storage.failed",
        event_domain = "session",
        action,
        key,
        "credential storage {} failed: {}",
        action,
        error
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn handle() -> SessionHandle {
        SessionHandle::new(Arc::new(MemoryStore::new()))
    }

    fn profile(id: i64) -> UserProfile {
        serde_json::from_value(json!({ "id": id })).unwrap()
    }

    #[test]
    fn test_new_handle_is_anonymous() {
        let session = handle();
        assert!(session.snapshot().is_anonymous());
        assert!(session.access_token().is_none());
    }

    #[test]
    fn test_establish_mirrors_to_storage() {
        let session = handle();
        session.establish(profile(1), "AT1".into(), "RT1".into());

        assert_eq!(session.memory_access_token().as_deref(), Some("AT1"));
        assert_eq!(
            session.stored_tokens(),
            Some(("AT1".to_string(), "RT1".to_string()))
        );
    }

    #[test]
    fn test_access_token_falls_back_to_storage() {
        let session = handle();
        session.storage().set(ACCESS_TOKEN_KEY, "stored").unwrap();
        assert!(session.memory_access_token().is_none());
        assert_eq!(session.access_token().as_deref(), Some("stored"));
    }

    #[test]
    fn test_clear_wipes_memory_and_storage() {
        let session = handle();
        session.establish(profile(1), "AT1".into(), "RT1".into());
        session.clear();

        assert!(session.snapshot().is_anonymous());
        assert!(session.user().is_none());
        assert!(session.stored_tokens().is_none());
        assert!(session.storage().get(REFRESH_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_replace_access_token_keeps_refresh_token() {
        let session = handle();
        session.establish(profile(1), "AT1".into(), "RT1".into());
        session.replace_access_token("AT2".into());

        assert_eq!(
            session.stored_tokens(),
            Some(("AT2".to_string(), "RT1".to_string()))
        );
        assert_eq!(session.refresh_token().as_deref(), Some("RT1"));
    }

    #[test]
    fn test_replace_access_token_restores_cleared_storage() {
        let session = handle();
        session.establish(profile(1), "AT1".into(), "RT1".into());
        session.clear_storage();

        session.replace_access_token("AT2".into());

        assert_eq!(
            session.stored_tokens(),
            Some(("AT2".to_string(), "RT1".to_string()))
        );
        assert_eq!(session.user().unwrap().id, json!(1));
    }
}
