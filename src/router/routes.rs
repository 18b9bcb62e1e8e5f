//! The static route table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteName {
    Home,
    Login,
    Categorias,
    Presentaciones,
    Productos,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "home",
            RouteName::Login => "login",
            RouteName::Categorias => "categorias",
            RouteName::Presentaciones => "presentaciones",
            RouteName::Productos => "productos",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROUTES
            .iter()
            .map(|r| r.name)
            .find(|n| n.as_str() == s)
            .ok_or_else(|| format!("unknown route name '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub title: &'static str,
}

/// A navigable destination: path, name, the view it renders and its
/// metadata. Defined once at startup and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: RouteName,
    pub view: &'static str,
    pub meta: RouteMeta,
}

pub static ROUTES: [RouteDescriptor; 5] = [
    RouteDescriptor {
        path: "/",
        name: RouteName::Home,
        view: "HomeView",
        meta: RouteMeta {
            requires_auth: false,
            title: "Inicio - Catálogo de Productos",
        },
    },
    RouteDescriptor {
        path: "/login",
        name: RouteName::Login,
        view: "LoginView",
        meta: RouteMeta {
            requires_auth: false,
            title: "Iniciar Sesión",
        },
    },
    RouteDescriptor {
        path: "/categorias",
        name: RouteName::Categorias,
        view: "CategoriaView",
        meta: RouteMeta {
            requires_auth: true,
            title: "Categorías - Administración",
        },
    },
    RouteDescriptor {
        path: "/presentaciones",
        name: RouteName::Presentaciones,
        view: "PresentacionView",
        meta: RouteMeta {
            requires_auth: true,
            title: "Presentaciones - Administración",
        },
    },
    RouteDescriptor {
        path: "/productos",
        name: RouteName::Productos,
        view: "ProductoView",
        meta: RouteMeta {
            requires_auth: true,
            title: "Productos - Administración",
        },
    },
];

/// Where unknown paths are sent.
pub const FALLBACK_PATH: &str = "/";

pub fn route(name: RouteName) -> &'static RouteDescriptor {
    // every RouteName has exactly one entry in ROUTES
    ROUTES
        .iter()
        .find(|r| r.name == name)
        .unwrap_or(&ROUTES[0])
}

/// Strips query/fragment and trailing slashes: `/productos/?page=2` -> `/productos`.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Matches a path against the table; `None` means the catch-all applies.
pub fn resolve(path: &str) -> Option<&'static RouteDescriptor> {
    let path = normalize_path(path);
    ROUTES.iter().find(|r| r.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_has_one_route() {
        for r in ROUTES.iter() {
            assert_eq!(route(r.name).path, r.path);
            assert_eq!(r.name.as_str().parse::<RouteName>().unwrap(), r.name);
        }
    }

    #[test]
    fn test_only_admin_screens_require_auth() {
        let protected: Vec<_> = ROUTES
            .iter()
            .filter(|r| r.meta.requires_auth)
            .map(|r| r.name)
            .collect();
        assert_eq!(
            protected,
            vec![
                RouteName::Categorias,
                RouteName::Presentaciones,
                RouteName::Productos
            ]
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("productos/"), "/productos");
        assert_eq!(normalize_path("/productos?page=2#top"), "/productos");
    }

    #[test]
    fn test_resolve_unknown_path() {
        assert!(resolve("/usuarios").is_none());
        assert_eq!(resolve("/login/").unwrap().name, RouteName::Login);
    }
}
