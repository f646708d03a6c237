//! Per-connection request/response state machine.

use crate::dispatch::Exchange;
use crate::http::parser::RequestParser;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::router::{self, AppRoute, Handler, Router, RouterKind, static_files};
use crate::server::ServerState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

pub struct Connection {
    stream: TcpStream,
    parser: RequestParser,
    state: ConnectionState,
    server: Arc<ServerState>,
}

pub enum ConnectionState {
    Reading,
    Routing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, server: Arc<ServerState>) -> Self {
        Self {
            stream,
            parser: RequestParser::new(),
            state: ConnectionState::Reading,
            server,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    match self.read_request().await? {
                        Some(req) => {
                            self.state = ConnectionState::Routing(req);
                        }
                        None => {
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Routing(req) => {
                    let keep_alive = req.keep_alive;
                    let (mut response, file) =
                        Self::handle_request(&self.server, req).await;
                    response.finalize(keep_alive);

                    let mut writer = ResponseWriter::new(&response);
                    if let Some(path) = file {
                        writer = writer.with_file(path);
                    }
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Read and assemble one request.
    ///
    /// Returns `None` on a clean peer close. Parse errors abort the
    /// connection without a response; the malformed request is dropped
    /// silently on the wire and surfaced only to the log.
    async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let mut request = Request::new();

        // Leftover buffered bytes may already hold the next pipelined
        // request; give the parser a chance before touching the socket.
        let mut events = self
            .parser
            .feed(&[])
            .map_err(|e| anyhow::anyhow!("HTTP parse error: {:?}", e))?;

        loop {
            for event in events.drain(..) {
                request
                    .apply(event)
                    .map_err(|e| anyhow::anyhow!("HTTP parse error: {:?}", e))?;
            }

            if request.is_complete() {
                return Ok(Some(request));
            }

            let mut temp = [0u8; 1024];
            let n = timeout(self.server.read_timeout, self.stream.read(&mut temp)).await??;

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }

            events = self
                .parser
                .feed(&temp[..n])
                .map_err(|e| anyhow::anyhow!("HTTP parse error: {:?}", e))?;
        }
    }

    /// Resolve the request to a handler and produce the response, plus an
    /// optional file payload to stream after the headers.
    async fn handle_request(
        server: &ServerState,
        req: &Request,
    ) -> (Response, Option<PathBuf>) {
        let mut resp = Response::new();
        let mut file = None;

        let (handler, owner) = router::resolve(&server.routers, req);
        let owning_router = owner.map(|i| &server.routers[i]);

        match handler {
            Handler::NotFound => {
                tracing::debug!(path = %req.path, "No route matched");
                resp.not_found();
            }

            Handler::Redirect(url) => {
                resp.redirect(&url);
            }

            Handler::StaticFile => match owning_router.map(Router::kind) {
                Some(RouterKind::Static {
                    directory,
                    allow_index,
                }) => {
                    let mount = owning_router
                        .map(Router::mount_point)
                        .unwrap_or("/");
                    file = static_files::respond(directory, *allow_index, mount, req, &mut resp)
                        .await;
                }
                _ => resp.not_found(),
            },

            Handler::App(route) => {
                Self::dispatch_app(server, owning_router, &route, req, &mut resp).await;
            }
        }

        (resp, file)
    }

    /// Hand the exchange to application code and persist session data.
    async fn dispatch_app(
        server: &ServerState,
        owning_router: Option<&Router>,
        route: &AppRoute,
        req: &Request,
        resp: &mut Response,
    ) {
        let store = owning_router.and_then(|r| r.session_store());
        let session_id = store.and_then(|s| {
            req.cookies
                .get(s.name())
                .map(|cookie| cookie.value().to_string())
        });

        let mut exchange = Exchange {
            request: req,
            response: &mut *resp,
            session: None,
        };

        if let (Some(store), Some(id)) = (store, &session_id) {
            exchange.session = store.read(id).await;
        }

        match server.registry.dispatch(route, &mut exchange).await {
            Ok(()) => {
                let session = exchange.session.take();
                if let (Some(store), Some(data)) = (store, session) {
                    let (id, fresh) = match session_id {
                        Some(id) => (id, false),
                        None => (store.create_id(), true),
                    };
                    if let Err(e) = store.write(&id, &data).await {
                        tracing::error!(error = %e, "Failed to persist session data");
                    } else if fresh {
                        resp.set_cookie(store.cookie_for(&id));
                    }
                }
            }
            Err(e) => {
                tracing::error!(
                    module = %route.module,
                    cls = %route.cls,
                    action = %route.action,
                    error = %e,
                    "Dispatch failed"
                );
                resp.server_error();
            }
        }
    }
}
