//! Application dispatch boundary.
//!
//! The core does not know anything about application code beyond this
//! contract: a resolved [`AppRoute`](crate::router::AppRoute) names a
//! module, a controller class and an action; the registry maps the first
//! two to a controller factory and the connection loop drives the hooks in
//! order: `before_action`, the action itself, `after_action`. Any hook
//! failing produces a 500 for the client.

use crate::http::request::Request;
use crate::http::response::Response;
use crate::router::AppRoute;
use async_trait::async_trait;
use std::collections::HashMap;

/// One request/response exchange as seen by application code.
///
/// `session` carries the opaque session blob: populated from the router's
/// store before the hooks run, written back afterwards if still set.
pub struct Exchange<'a> {
    pub request: &'a Request,
    pub response: &'a mut Response,
    pub session: Option<Vec<u8>>,
}

/// A controller instantiated per request.
#[async_trait]
pub trait Controller: Send {
    async fn before_action(&mut self, _ex: &mut Exchange<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Run the named action. Unknown actions should fail.
    async fn action(&mut self, name: &str, ex: &mut Exchange<'_>) -> anyhow::Result<()>;

    async fn after_action(&mut self, _ex: &mut Exchange<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

type ControllerFactory = Box<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// Maps (module, class) to controller factories.
#[derive(Default)]
pub struct ControllerRegistry {
    factories: HashMap<(String, String), ControllerFactory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for controllers of `cls` inside `module`.
    pub fn register<F>(&mut self, module: impl Into<String>, cls: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Controller> + Send + Sync + 'static,
    {
        self.factories
            .insert((module.into(), cls.into()), Box::new(factory));
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiate the controller for `route` and run its hooks in order.
    pub async fn dispatch(&self, route: &AppRoute, ex: &mut Exchange<'_>) -> anyhow::Result<()> {
        let module = if route.package == "." {
            route.module.clone()
        } else {
            format!("{}.{}", route.package, route.module)
        };

        let factory = self
            .factories
            .get(&(module.clone(), route.cls.clone()))
            .ok_or_else(|| anyhow::anyhow!("no controller registered for {}.{}", module, route.cls))?;

        let mut controller = factory();
        controller.before_action(ex).await?;
        controller.action(&route.action, ex).await?;
        controller.after_action(ex).await?;

        Ok(())
    }
}
