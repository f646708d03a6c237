//! Resolved route handlers.

use std::collections::HashMap;

/// Destination of an application route: which controller to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRoute {
    /// Package namespace, `.` for the root package.
    pub package: String,
    /// Module the controller lives in.
    pub module: String,
    /// Controller class name, e.g. `BlogController`.
    pub cls: String,
    /// Action method to invoke.
    pub action: String,
    /// Extra arguments captured during resolution.
    pub args: HashMap<String, String>,
}

impl AppRoute {
    pub fn new(
        package: impl Into<String>,
        module: impl Into<String>,
        cls: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            module: module.into(),
            cls: cls.into(),
            action: action.into(),
            args: HashMap::new(),
        }
    }
}

/// What the dispatch loop should do for one request.
///
/// Produced by router resolution and consumed immediately; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// Hand off to application code.
    App(AppRoute),
    /// Serve from the owning router's static directory.
    StaticFile,
    /// Redirect to the given URL.
    Redirect(String),
    /// Nothing matched; answer with the canned 404.
    NotFound,
}

impl Handler {
    pub fn is_valid(&self) -> bool {
        !matches!(self, Handler::NotFound)
    }
}
