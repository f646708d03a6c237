//! Mount-point routing.
//!
//! A server carries an ordered list of [`Router`]s, each mounted at a URL
//! path prefix. Resolution is two-phase: a best-match pass scores every
//! non-custom router's mount point against the request path, then every
//! custom router's explicit route map gets a chance to override with an
//! exact URL match.
//!
//! # Scoring
//!
//! The best-match score is the number of positions, counted from index 0,
//! where the mount point and the request path hold the same character. The
//! count does not stop at the first mismatch and is not anchored to `/`
//! boundaries, so `/apple/` scores 3 against `/api` — surprising but kept
//! for compatibility. Ties go to the later-registered router.

pub mod handler;
pub mod static_files;

pub use handler::{AppRoute, Handler};

use crate::http::request::{Method, Request};
use crate::session::SessionStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-variant routing payload.
#[derive(Debug, Clone)]
pub enum RouterKind {
    /// Serve files from a directory.
    Static {
        directory: String,
        allow_index: bool,
    },
    /// Map path segments to module/controller/action by convention.
    Mvc,
    /// Map the first path segment to a resource controller, the HTTP
    /// method to an action.
    Rest,
    /// Explicit URL → handler map, consulted as an override.
    Custom { routes: HashMap<String, Handler> },
}

/// One mounted route source.
///
/// The mount point is always normalized to end with `/`.
#[derive(Clone)]
pub struct Router {
    mount_point: String,
    package: String,
    session_store: Option<Arc<SessionStore>>,
    kind: RouterKind,
}

impl Router {
    fn new(mount_point: &str, kind: RouterKind) -> Self {
        Self {
            mount_point: normalize_mount_point(mount_point),
            package: ".".to_string(),
            session_store: None,
            kind,
        }
    }

    /// A router serving files from `directory`. Directory listings are off
    /// until enabled with [`Router::set_allow_index`].
    pub fn static_files(mount_point: &str, directory: impl Into<String>) -> Self {
        Self::new(
            mount_point,
            RouterKind::Static {
                directory: directory.into(),
                allow_index: false,
            },
        )
    }

    /// A convention-based MVC router.
    pub fn mvc(mount_point: &str) -> Self {
        Self::new(mount_point, RouterKind::Mvc)
    }

    /// A REST resource router.
    pub fn rest(mount_point: &str) -> Self {
        Self::new(mount_point, RouterKind::Rest)
    }

    /// A custom router with an explicit route map.
    pub fn custom(routes: HashMap<String, Handler>) -> Self {
        Self::new("/", RouterKind::Custom { routes })
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn session_store(&self) -> Option<&Arc<SessionStore>> {
        self.session_store.as_ref()
    }

    pub fn kind(&self) -> &RouterKind {
        &self.kind
    }

    pub fn set_mount_point(&mut self, mount_point: &str) {
        self.mount_point = normalize_mount_point(mount_point);
    }

    pub fn set_package(&mut self, package: impl Into<String>) {
        self.package = package.into();
    }

    pub fn set_session_store(&mut self, store: Arc<SessionStore>) {
        self.session_store = Some(store);
    }

    pub fn set_allow_index(&mut self, allow: bool) {
        if let RouterKind::Static { allow_index, .. } = &mut self.kind {
            *allow_index = allow;
        }
    }

    /// Add an exact route to a custom router. Ignored for other variants.
    pub fn register_route(&mut self, url: impl Into<String>, handler: Handler) {
        if let RouterKind::Custom { routes } = &mut self.kind {
            routes.insert(url.into(), handler);
        }
    }

    /// Resolve a request against this router.
    pub fn route(&self, req: &Request) -> Handler {
        match &self.kind {
            RouterKind::Static { .. } => Handler::StaticFile,
            RouterKind::Mvc => self.route_mvc(req),
            RouterKind::Rest => self.route_rest(req),
            RouterKind::Custom { routes } => routes
                .get(&req.url)
                .cloned()
                .unwrap_or(Handler::NotFound),
        }
    }

    fn route_mvc(&self, req: &Request) -> Handler {
        let Some(rest) = req.path.strip_prefix(self.mount_point.as_str()) else {
            return Handler::NotFound;
        };

        let mut segments = rest.split('/').filter(|s| !s.is_empty());

        let (module, cls) = match segments.next() {
            Some(seg) => (seg.to_string(), controller_class(seg)),
            None => ("index".to_string(), "IndexController".to_string()),
        };
        let action = segments.next().unwrap_or("index").to_string();

        Handler::App(AppRoute::new(self.package.clone(), module, cls, action))
    }

    fn route_rest(&self, req: &Request) -> Handler {
        let Some(rest) = req.path.strip_prefix(self.mount_point.as_str()) else {
            return Handler::NotFound;
        };

        let mut segments = rest.split('/').filter(|s| !s.is_empty());

        let Some(resource) = segments.next() else {
            return Handler::NotFound;
        };
        let item_id = segments.next();

        let action = match req.method {
            Method::GET => {
                if item_id.is_none() {
                    "get_all"
                } else {
                    "get_one"
                }
            }
            Method::POST => {
                if item_id.is_some() {
                    return Handler::NotFound;
                }
                "create_one"
            }
            Method::PUT => {
                if item_id.is_none() {
                    return Handler::NotFound;
                }
                "update_one"
            }
            Method::DELETE => {
                if item_id.is_none() {
                    return Handler::NotFound;
                }
                "delete_one"
            }
            _ => return Handler::NotFound,
        };

        let mut route = AppRoute::new(
            self.package.clone(),
            resource,
            controller_class(resource),
            action,
        );
        if let Some(id) = item_id {
            route.args.insert("id".to_string(), id.to_string());
        }

        Handler::App(route)
    }
}

/// Pick the best-scoring non-custom router for a request path.
///
/// Iterates in registration order and replaces the current best on
/// `score >= best`, so the later-registered router wins exact ties.
pub fn best_match(routers: &[Router], path: &str) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;

    for (i, router) in routers.iter().enumerate() {
        if matches!(router.kind, RouterKind::Custom { .. }) {
            continue;
        }

        let score = common_prefix_score(&router.mount_point, path);
        match best {
            Some((_, best_score)) if score < best_score => {}
            _ => best = Some((i, score)),
        }
    }

    best.map(|(i, _)| i)
}

/// Full two-phase resolution: best match, then custom-route override.
///
/// Custom routers match the raw request URL, query string included, and
/// always win over the prefix-matched result. Returns the handler and the
/// index of the router that produced it.
pub fn resolve(routers: &[Router], req: &Request) -> (Handler, Option<usize>) {
    let mut resolved = Handler::NotFound;
    let mut owner = None;

    if let Some(i) = best_match(routers, &req.path) {
        resolved = routers[i].route(req);
        owner = Some(i);
    }

    for (i, router) in routers.iter().enumerate() {
        if let RouterKind::Custom { routes } = &router.kind {
            if let Some(handler) = routes.get(&req.url) {
                resolved = handler.clone();
                owner = Some(i);
                break;
            }
        }
    }

    (resolved, owner)
}

fn normalize_mount_point(mount_point: &str) -> String {
    let mut normalized = mount_point.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Count positions where both strings hold the same character.
fn common_prefix_score(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).filter(|(x, y)| x == y).count()
}

fn controller_class(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}Controller", first.to_ascii_uppercase(), chars.as_str()),
        None => "Controller".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_counts_past_mismatches() {
        // '/', 'a', 'p' match, then 'l'/'i' differ, then 'e'/'/' differ.
        assert_eq!(common_prefix_score("/apple", "/api/x"), 3);
        // Positions realign after a mismatch and keep counting.
        assert_eq!(common_prefix_score("/ab", "/xb"), 2);
    }

    #[test]
    fn mount_points_gain_trailing_slash() {
        assert_eq!(normalize_mount_point("/static"), "/static/");
        assert_eq!(normalize_mount_point("/static/"), "/static/");
        assert_eq!(normalize_mount_point(""), "/");
    }

    #[test]
    fn controller_class_titlecases() {
        assert_eq!(controller_class("blog"), "BlogController");
        assert_eq!(controller_class("users"), "UsersController");
    }
}
