//! The session store: authentication lifecycle on top of [`SessionHandle`].
//!
//! Every operation that talks to the backend converts transport and
//! backend failures into booleans or an [`AuthOutcome`]; nothing here
//! returns an error to the caller.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backend::AuthBackend;
use super::session::SessionHandle;
use crate::http::ApiError;
use crate::models::{ApiEnvelope, Credentials, LoginData, Registration, Session, UserProfile};

/// Shown when the backend could not be reached or gave no reason.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error";

/// Result of a login or registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl AuthOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn failed(message: Option<String>) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

#[derive(Clone)]
pub struct AuthStore {
    session: SessionHandle,
    backend: Arc<dyn AuthBackend>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("session", &self.session)
            .finish()
    }
}

impl AuthStore {
    pub fn new(session: SessionHandle, backend: Arc<dyn AuthBackend>) -> Self {
        Self { session, backend }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn snapshot(&self) -> Session {
        self.session.snapshot()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.session.user()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    /// True iff an access token is held in memory or in durable storage.
    pub fn is_authenticated(&self) -> bool {
        self.session.access_token().is_some()
    }

    /// Lightweight check used on every guarded navigation: is an access
    /// token held in memory? Never contacts the backend.
    pub fn ensure_authenticated(&self) -> bool {
        self.session.memory_access_token().is_some()
    }

    /// Hydrates the session from durable storage when both tokens are
    /// stored and differ from what is already held, then loads the user
    /// profile in the background. Returns the background task, if one was
    /// started.
    pub fn initialize_auth(&self) -> Option<JoinHandle<()>> {
        if !self.restore_session() {
            return None;
        }

        match Handle::try_current() {
            Ok(runtime) => {
                let store = self.clone();
                Some(runtime.spawn(async move { store.load_user_info().await }))
            }
            Err(_) => {
                warn!("No async runtime available; skipping background user info load");
                None
            }
        }
    }

    /// The hydration half of [`AuthStore::initialize_auth`]: loads both
    /// stored tokens into memory without fetching the profile. Returns true
    /// when the in-memory tokens changed.
    pub fn restore_session(&self) -> bool {
        let Some((access_token, refresh_token)) = self.session.stored_tokens() else {
            return false;
        };

        let current = self.session.snapshot();
        if current.access_token.as_deref() == Some(access_token.as_str())
            && current.refresh_token.as_deref() == Some(refresh_token.as_str())
        {
            return false;
        }

        debug!(
            event_name = "session.hydrated",
            event_domain = "session",
            "restored tokens from durable storage"
        );
        self.session.hydrate(access_token, refresh_token);
        true
    }

    pub async fn login(&self, credentials: &Credentials) -> AuthOutcome {
        debug!("Logging in as '{}'", credentials.email);
        self.session.set_loading(true);
        let result = self.backend.login(credentials).await;
        self.session.set_loading(false);
        self.accept_login("login", result)
    }

    pub async fn register(&self, registration: &Registration) -> AuthOutcome {
        debug!("Registering '{}'", registration.email);
        self.session.set_loading(true);
        let result = self.backend.register(registration).await;
        self.session.set_loading(false);
        self.accept_login("register", result)
    }

    fn accept_login(
        &self,
        action: &str,
        result: Result<ApiEnvelope<LoginData>, ApiError>,
    ) -> AuthOutcome {
        match result {
            Ok(envelope) if envelope.success => match envelope.data {
                Some(data) => {
                    info!(
                        event_name = "session.established",
                        event_domain = "session",
                        action,
                        user = data.user.display_name().as_str(),
                        "session established"
                    );
                    self.session
                        .establish(data.user, data.access_token, data.refresh_token);
                    AuthOutcome::ok()
                }
                None => {
                    warn!("{} succeeded without a token payload", action);
                    AuthOutcome::failed(Some(CONNECTION_ERROR_MESSAGE.to_string()))
                }
            },
            Ok(envelope) => {
                info!("{} rejected by backend: {:?}", action, envelope.message);
                AuthOutcome::failed(envelope.message)
            }
            Err(e) => {
                warn!("Error during {}: {}", action, e);
                let message = e
                    .backend_message()
                    .unwrap_or(CONNECTION_ERROR_MESSAGE)
                    .to_string();
                AuthOutcome::failed(Some(message))
            }
        }
    }

    /// Obtains a new access token. Fails fast, without a network call, when
    /// no refresh token is held.
    pub async fn refresh_access_token(&self) -> bool {
        let Some(refresh_token) = self.session.refresh_token() else {
            debug!("No refresh token held; not refreshing");
            return false;
        };

        match self.backend.refresh(&refresh_token).await {
            Ok(envelope) => match envelope.into_data() {
                Some(data) => {
                    self.session.replace_access_token(data.access_token);
                    info!(
                        event_name = "session.refreshed",
                        event_domain = "session",
                        "access token refreshed"
                    );
                    true
                }
                None => false,
            },
            Err(e) => {
                warn!("Error refreshing token: {}", e);
                false
            }
        }
    }

    /// Clears the profile and both tokens from memory and durable storage.
    /// The backend is not contacted.
    pub fn logout(&self) {
        self.session.clear();
        info!(
            event_name = "session.cleared",
            event_domain = "session",
            "logged out"
        );
    }

    pub async fn check_token_validity(&self) -> bool {
        match self.backend.me().await {
            Ok(envelope) => envelope.success,
            Err(e) => {
                debug!("Token validity check failed: {}", e);
                false
            }
        }
    }

    /// Fetches the profile and stores it; on failure the profile is left as
    /// it was.
    pub async fn load_user_info(&self) {
        match self.backend.me().await {
            Ok(envelope) => {
                if let Some(data) = envelope.into_data() {
                    self.session.set_user(data.into_user());
                }
            }
            Err(e) => warn!("Error loading user info: {}", e),
        }
    }

    /// Waits for `pending` (a load started by [`AuthStore::initialize_auth`])
    /// or runs a fresh load, then returns the profile held afterwards.
    /// `None` means no profile could be obtained.
    pub async fn resolve_user(&self, pending: Option<JoinHandle<()>>) -> Option<UserProfile> {
        match pending {
            Some(task) => {
                if let Err(e) = task.await {
                    warn!("User info load did not finish: {}", e);
                }
            }
            None => self.load_user_info().await,
        }
        self.current_user()
    }
}
