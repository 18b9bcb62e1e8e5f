//! Path-based navigation: resolves a path, runs the guard and follows its
//! redirects.

use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, info};

use super::guard::{GuardDecision, RouteGuard, ViewContext};
use super::routes::{resolve, route, RouteDescriptor, RouteName, FALLBACK_PATH};
use crate::auth::AuthStore;

/// Upper bound on guard redirects followed for a single navigation.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation to '{0}' exceeded {max} redirects", max = MAX_REDIRECTS)]
    RedirectLoop(String),
}

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub route: &'static RouteDescriptor,
    pub redirected: bool,
}

#[derive(Clone, Debug)]
pub struct Router {
    guard: RouteGuard,
    view: ViewContext,
    current: Arc<RwLock<Option<RouteName>>>,
}

impl Router {
    pub fn new(auth: AuthStore) -> Self {
        let view = ViewContext::new();
        Self {
            guard: RouteGuard::new(auth, view.clone()),
            view,
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub fn current_route(&self) -> Option<&'static RouteDescriptor> {
        let name = self.current.read().ok().and_then(|c| *c)?;
        Some(route(name))
    }

    /// Title of the last view the guard allowed.
    pub fn title(&self) -> Option<String> {
        self.view.title()
    }

    pub fn push(&self, name: RouteName) -> Result<Navigation, NavigationError> {
        self.navigate(route(name).path)
    }

    /// Navigates to `path`. Unknown paths are sent to the fallback route;
    /// guard redirects are followed until a route is allowed.
    pub fn navigate(&self, path: &str) -> Result<Navigation, NavigationError> {
        let (mut target, mut redirected) = match resolve(path) {
            Some(found) => (found, false),
            None => {
                debug!("No route matches '{}'; falling back to '{}'", path, FALLBACK_PATH);
                (route(RouteName::Home), true)
            }
        };
        let from = self.current_route();

        for _ in 0..=MAX_REDIRECTS {
            match self.guard.before_each(target, from) {
                GuardDecision::Allow => {
                    if let Ok(mut current) = self.current.write() {
                        *current = Some(target.name);
                    }
                    info!(
                        event_name = "router.navigated",
                        event_domain = "router",
                        requested = path,
                        route = target.path,
                        redirected,
                        "navigated"
                    );
                    return Ok(Navigation {
                        requested: path.to_string(),
                        route: target,
                        redirected,
                    });
                }
                GuardDecision::Redirect(next) => {
                    debug!("Guard redirected '{}' to '{}'", target.path, next);
                    target = route(next);
                    redirected = true;
                }
            }
        }

        Err(NavigationError::RedirectLoop(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthBackend, SessionHandle};
    use crate::http::ApiError;
    use crate::models::{ApiEnvelope, Credentials, LoginData, MeData, RefreshData, Registration};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use serde_json::Value;

    struct Unreachable;

    fn unreachable() -> ApiError {
        ApiError::Configuration("unreachable".to_string())
    }

    #[async_trait]
    impl AuthBackend for Unreachable {
        async fn login(&self, _: &Credentials) -> Result<ApiEnvelope<LoginData>, ApiError> {
            Err(unreachable())
        }
        async fn register(&self, _: &Registration) -> Result<ApiEnvelope<LoginData>, ApiError> {
            Err(unreachable())
        }
        async fn refresh(&self, _: &str) -> Result<ApiEnvelope<RefreshData>, ApiError> {
            Err(unreachable())
        }
        async fn me(&self) -> Result<ApiEnvelope<MeData>, ApiError> {
            Err(unreachable())
        }
        async fn logout(&self) -> Result<ApiEnvelope<Value>, ApiError> {
            Err(unreachable())
        }
    }

    fn router() -> Router {
        let session = SessionHandle::new(Arc::new(MemoryStore::new()));
        Router::new(AuthStore::new(session, Arc::new(Unreachable)))
    }

    #[test]
    fn test_unknown_path_falls_back_to_home() {
        let router = router();
        let nav = router.navigate("/no-such-page").unwrap();
        assert_eq!(nav.route.name, RouteName::Home);
        assert!(nav.redirected);
        assert_eq!(router.current_route().unwrap().name, RouteName::Home);
    }

    #[test]
    fn test_protected_path_lands_on_login() {
        let router = router();
        let nav = router.navigate("/categorias").unwrap();
        assert_eq!(nav.route.name, RouteName::Login);
        assert!(nav.redirected);
        assert_eq!(router.title().as_deref(), Some("Iniciar Sesión"));
    }

    #[test]
    fn test_push_by_name_after_authentication() {
        let router = router();
        router
            .guard
            .auth()
            .session()
            .hydrate("AT1".into(), "RT1".into());

        let nav = router.push(RouteName::Productos).unwrap();
        assert_eq!(nav.route.name, RouteName::Productos);
        assert!(!nav.redirected);

        let nav = router.navigate("/login").unwrap();
        assert_eq!(nav.route.name, RouteName::Home);
    }
}
