//! Server assembly and lifecycle.

pub mod listener;

use crate::config::Config;
use crate::dispatch::ControllerRegistry;
use crate::router::Router;
use std::sync::Arc;
use std::time::Duration;

/// Shared, read-mostly state every connection task sees.
///
/// Built once at startup; the router table is immutable afterwards, so no
/// locking is needed around it.
pub struct ServerState {
    pub routers: Vec<Router>,
    pub registry: ControllerRegistry,
    pub read_timeout: Duration,
}

/// The server under configuration.
///
/// Routers and controllers are added before [`Server::run`]; a server
/// started with no routers installs a default static router on `/` serving
/// the current directory with listings enabled.
pub struct Server {
    config: Config,
    routers: Vec<Router>,
    registry: ControllerRegistry,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            routers: Vec::new(),
            registry: ControllerRegistry::new(),
        }
    }

    pub fn add_router(&mut self, router: Router) {
        self.routers.push(router);
    }

    pub fn registry_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.registry
    }

    /// Bind the listening socket and serve until interrupted.
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            config,
            mut routers,
            registry,
        } = self;

        if routers.is_empty() {
            tracing::warn!("No routers set, will use the default router: static on /");
            let mut fallback = Router::static_files("/", ".");
            fallback.set_allow_index(true);
            routers.push(fallback);
        }

        let state = Arc::new(ServerState {
            routers,
            registry,
            read_timeout: config.read_timeout(),
        });

        listener::run(&config, state).await
    }
}
