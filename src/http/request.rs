//! HTTP request representation.
//!
//! A [`Request`] is assembled incrementally by applying
//! [`ParseEvent`](crate::http::parser::ParseEvent)s as the parser produces
//! them, mirroring the callback protocol of a streaming byte parser.

use crate::http::cookie::{self, Cookie};
use crate::http::parser::{ParseError, ParseEvent};
use crate::http::url;
use std::collections::HashMap;

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    DELETE,
    GET,
    HEAD,
    POST,
    PUT,
    CONNECT,
    OPTIONS,
    TRACE,
    COPY,
    LOCK,
    MKCOL,
    MOVE,
    PROPFIND,
    PROPPATCH,
    SEARCH,
    UNLOCK,
    REPORT,
    MKACTIVITY,
    CHECKOUT,
    MERGE,
    MSEARCH,
    NOTIFY,
    SUBSCRIBE,
    UNSUBSCRIBE,
    PATCH,
    PURGE,
}

impl Method {
    /// Parses an HTTP method from its uppercase wire form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DELETE" => Some(Method::DELETE),
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "CONNECT" => Some(Method::CONNECT),
            "OPTIONS" => Some(Method::OPTIONS),
            "TRACE" => Some(Method::TRACE),
            "COPY" => Some(Method::COPY),
            "LOCK" => Some(Method::LOCK),
            "MKCOL" => Some(Method::MKCOL),
            "MOVE" => Some(Method::MOVE),
            "PROPFIND" => Some(Method::PROPFIND),
            "PROPPATCH" => Some(Method::PROPPATCH),
            "SEARCH" => Some(Method::SEARCH),
            "UNLOCK" => Some(Method::UNLOCK),
            "REPORT" => Some(Method::REPORT),
            "MKACTIVITY" => Some(Method::MKACTIVITY),
            "CHECKOUT" => Some(Method::CHECKOUT),
            "MERGE" => Some(Method::MERGE),
            "MSEARCH" => Some(Method::MSEARCH),
            "NOTIFY" => Some(Method::NOTIFY),
            "SUBSCRIBE" => Some(Method::SUBSCRIBE),
            "UNSUBSCRIBE" => Some(Method::UNSUBSCRIBE),
            "PATCH" => Some(Method::PATCH),
            "PURGE" => Some(Method::PURGE),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::DELETE => "DELETE",
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::CONNECT => "CONNECT",
            Method::OPTIONS => "OPTIONS",
            Method::TRACE => "TRACE",
            Method::COPY => "COPY",
            Method::LOCK => "LOCK",
            Method::MKCOL => "MKCOL",
            Method::MOVE => "MOVE",
            Method::PROPFIND => "PROPFIND",
            Method::PROPPATCH => "PROPPATCH",
            Method::SEARCH => "SEARCH",
            Method::UNLOCK => "UNLOCK",
            Method::REPORT => "REPORT",
            Method::MKACTIVITY => "MKACTIVITY",
            Method::CHECKOUT => "CHECKOUT",
            Method::MERGE => "MERGE",
            Method::MSEARCH => "MSEARCH",
            Method::NOTIFY => "NOTIFY",
            Method::SUBSCRIBE => "SUBSCRIBE",
            Method::UNSUBSCRIBE => "UNSUBSCRIBE",
            Method::PATCH => "PATCH",
            Method::PURGE => "PURGE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed HTTP request.
///
/// Created fresh when a message begins on a connection, populated event by
/// event, and handed to routing once [`Request::is_complete`] turns true.
#[derive(Debug, Clone)]
pub struct Request {
    /// Protocol major version.
    pub major: u8,
    /// Protocol minor version.
    pub minor: u8,
    /// The HTTP method.
    pub method: Method,
    /// Raw request target as it appeared on the wire, including any query.
    pub url: String,
    /// Path component of the target (everything before the first `?`).
    pub path: String,
    /// Value of the `Host` header, when present.
    pub host: Option<String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Query-string parameters (values stored as they appear on the wire).
    pub get: HashMap<String, String>,
    /// Form fields from a url-encoded body, values percent-decoded.
    pub post: HashMap<String, String>,
    /// Cookies from the `Cookie` header.
    pub cookies: HashMap<String, Cookie>,
    /// Whether the connection should be reused after this exchange.
    pub keep_alive: bool,

    complete: bool,
    pending_field: Option<String>,
    last_was_field: bool,
}

impl Request {
    pub fn new() -> Self {
        Self {
            major: 1,
            minor: 1,
            method: Method::GET,
            url: String::new(),
            path: String::new(),
            host: None,
            body: Vec::new(),
            headers: HashMap::new(),
            get: HashMap::new(),
            post: HashMap::new(),
            cookies: HashMap::new(),
            keep_alive: false,
            complete: false,
            pending_field: None,
            last_was_field: false,
        }
    }

    /// True once the message-complete event has been applied.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Retrieves a header value by name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Apply one parse event to the request under assembly.
    ///
    /// Two header-field events without an intervening value are a protocol
    /// violation and abort the connection.
    pub fn apply(&mut self, event: ParseEvent) -> Result<(), ParseError> {
        match event {
            ParseEvent::MessageBegin => {}

            ParseEvent::Url(bytes) => {
                self.url.push_str(&String::from_utf8_lossy(&bytes));
                self.extract_from_url();
            }

            ParseEvent::HeaderField(field) => {
                if self.last_was_field {
                    return Err(ParseError::ProtocolViolation);
                }
                self.pending_field = Some(String::from_utf8_lossy(&field).into_owned());
                self.last_was_field = true;
            }

            ParseEvent::HeaderValue(value) => {
                if self.last_was_field {
                    if let Some(field) = self.pending_field.take() {
                        self.headers
                            .insert(field, String::from_utf8_lossy(&value).into_owned());
                    }
                }
                self.last_was_field = false;
            }

            ParseEvent::HeadersComplete {
                method,
                major,
                minor,
            } => {
                self.method = method;
                self.major = major;
                self.minor = minor;
                self.keep_alive = self.compute_keep_alive();
                self.pending_field = None;
                self.last_was_field = false;

                self.host = self.headers.get("Host").cloned();
                if let Some(header) = self.headers.get("Cookie") {
                    self.cookies = cookie::parse_header(header);
                }
            }

            ParseEvent::Body(chunk) => {
                self.body.extend_from_slice(&chunk);
                if self.header("Content-Type") == Some("application/x-www-form-urlencoded") {
                    // Re-parses the whole accumulated body on every chunk;
                    // quadratic for large bodies.
                    self.extract_form_body();
                }
            }

            ParseEvent::MessageComplete => {
                self.complete = true;
            }
        }

        Ok(())
    }

    /// Split the raw url into path and query, populating the GET map.
    fn extract_from_url(&mut self) {
        match self.url.split_once('?') {
            None => {
                self.path = self.url.clone();
            }
            Some((path, query)) => {
                self.path = path.to_string();
                self.get.clear();
                for segment in query.split('&') {
                    let Some((key, value)) = segment.split_once('=') else {
                        continue;
                    };
                    self.get.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    /// Parse the accumulated body as `&`-separated url-encoded pairs.
    fn extract_form_body(&mut self) {
        let body = String::from_utf8_lossy(&self.body).into_owned();
        self.post.clear();
        for segment in body.split('&') {
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };
            self.post.insert(key.to_string(), url::decode(value));
        }
    }

    fn compute_keep_alive(&self) -> bool {
        let connection = self
            .headers
            .get("Connection")
            .map(|v| v.to_ascii_lowercase());

        if self.major == 1 && self.minor == 0 {
            // HTTP/1.0 closes unless asked to persist.
            connection.as_deref() == Some("keep-alive")
        } else {
            // HTTP/1.1 persists unless told otherwise.
            connection.as_deref() != Some("close")
        }
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}
