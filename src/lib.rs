//! Rampart - Embeddable HTTP Server Core
//!
//! Core library for HTTP/1.x serving: connection handling, incremental
//! request parsing, mount-point routing, static files and session storage.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod router;
pub mod server;
pub mod session;
