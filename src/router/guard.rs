//! The navigation guard run before every route transition.

use std::sync::{Arc, RwLock};

use tracing::debug;

use super::routes::{RouteDescriptor, RouteName};
use crate::auth::AuthStore;

/// What the guard decided for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(RouteName),
}

/// The active document/view context; the guard writes the page title here.
#[derive(Clone, Debug, Default)]
pub struct ViewContext {
    title: Arc<RwLock<Option<String>>>,
}

impl ViewContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<String> {
        self.title.read().ok().and_then(|t| t.clone())
    }

    pub fn set_title(&self, title: &str) {
        if let Ok(mut current) = self.title.write() {
            *current = Some(title.to_string());
        }
    }
}

#[derive(Clone, Debug)]
pub struct RouteGuard {
    auth: AuthStore,
    view: ViewContext,
}

impl RouteGuard {
    pub fn new(auth: AuthStore, view: ViewContext) -> Self {
        Self { auth, view }
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// 1. initialize auth (idempotent);
    /// 2. protected target without a held token -> login;
    /// 3. login target while authenticated -> home;
    /// 4. otherwise apply the title and allow.
    pub fn before_each(
        &self,
        to: &RouteDescriptor,
        from: Option<&RouteDescriptor>,
    ) -> GuardDecision {
        debug!(
            "Guarding navigation {} -> {}",
            from.map(|r| r.path).unwrap_or("(start)"),
            to.path
        );

        // The background profile load, if any, runs on its own.
        let _ = self.auth.initialize_auth();

        if to.meta.requires_auth {
            if !self.auth.ensure_authenticated() {
                debug!("'{}' requires authentication; redirecting to login", to.path);
                return GuardDecision::Redirect(RouteName::Login);
            }
        } else if to.name == RouteName::Login && self.auth.is_authenticated() {
            debug!("Already authenticated; redirecting login to home");
            return GuardDecision::Redirect(RouteName::Home);
        }

        self.view.set_title(to.meta.title);
        GuardDecision::Allow
    }
}
