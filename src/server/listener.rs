//! Listening socket and accept loop.

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpSocket;
use tracing::{error, info, warn};

pub async fn run(cfg: &Config, state: Arc<ServerState>) -> anyhow::Result<()> {
    let addr: SocketAddr = cfg.listen_addr().parse()?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    let listener = socket.listen(cfg.server.backlog)?;

    info!("Listening on {}", cfg.listen_addr());

    let active = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                info!("Accepted connection from {}", peer);

                let state = Arc::clone(&state);
                let active = Arc::clone(&active);
                tokio::spawn(async move {
                    active.fetch_add(1, Ordering::SeqCst);
                    let mut conn = Connection::new(stream, state);
                    if let Err(e) = conn.run().await {
                        error!("Connection error from {}: {}", peer, e);
                    }
                    active.fetch_sub(1, Ordering::SeqCst);
                });
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    drain(&active, cfg.shutdown_grace()).await;
    Ok(())
}

/// Give in-flight connections a bounded window to finish their writes.
async fn drain(active: &AtomicUsize, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;

    while active.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            warn!(
                remaining = active.load(Ordering::SeqCst),
                "Shutdown grace period expired with connections still open"
            );
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    info!("All connections drained");
}
