//! Client-side routing: the route table, the auth guard and a navigator.

pub mod guard;
pub mod navigator;
pub mod routes;

pub use guard::{GuardDecision, RouteGuard, ViewContext};
pub use navigator::{Navigation, NavigationError, Router, MAX_REDIRECTS};
pub use routes::{resolve, route, RouteDescriptor, RouteMeta, RouteName, ROUTES};
