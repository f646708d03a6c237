//! HTTP protocol implementation.
//!
//! This module implements an HTTP/1.x server core with support for
//! keep-alive connections.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The main connection handler implementing the request-response state machine
//! - **`parser`**: Incremental state machine turning raw socket bytes into parse events
//! - **`request`**: HTTP request representation, assembled from parse events
//! - **`response`**: HTTP response representation with cookie support and canned responses
//! - **`writer`**: Serializes and writes HTTP responses (and streamed files) to the client
//! - **`cookie`**: Cookie model plus `Cookie`/`Set-Cookie` header handling
//! - **`url`**: URL model and percent encoding/decoding
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Feed incoming bytes to the parser
//!        └──────┬──────┘
//!               │ Request complete
//!               ▼
//!        ┌──────────────────┐
//!        │    Routing       │ ← Resolve a handler and dispatch it
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response (and file payload) to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```

pub mod connection;
pub mod cookie;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod url;
pub mod writer;
