//! HTTP response representation and serialization.

use crate::http::cookie::Cookie;
use std::collections::HashMap;

const SERVER_NAME: &str = concat!("rampart/", env!("CARGO_PKG_VERSION"));

/// Returns the standard reason phrase for an HTTP status code.
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        _ => "Unknown",
    }
}

/// An HTTP response under construction.
///
/// Accumulates status, headers, cookies and body, then serializes once the
/// exchange is dispatched. Serialization is idempotent: calling
/// [`Response::serialize`] twice without mutation yields identical bytes.
#[derive(Debug)]
pub struct Response {
    pub major: u8,
    pub minor: u8,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, Cookie>,
    body: Vec<u8>,
}

impl Response {
    pub fn new() -> Self {
        let mut resp = Self {
            major: 1,
            minor: 1,
            status: 200,
            headers: HashMap::new(),
            cookies: HashMap::new(),
            body: Vec::new(),
        };
        resp.set_header("Server", SERVER_NAME);
        resp
    }

    pub fn set_version(&mut self, major: u8, minor: u8) {
        self.major = major;
        self.minor = minor;
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    pub fn set_cookie(&mut self, cookie: Cookie) {
        self.cookies.insert(cookie.name().to_string(), cookie);
    }

    /// Append data to the response body.
    pub fn write(&mut self, data: impl AsRef<[u8]>) {
        self.body.extend_from_slice(data.as_ref());
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace the body with a canned 404.
    pub fn not_found(&mut self) {
        self.status = 404;
        self.body = b"404 Not Found!".to_vec();
    }

    /// Replace the body with a canned 500.
    pub fn server_error(&mut self) {
        self.status = 500;
        self.body = b"500 Internal Server Error!".to_vec();
    }

    /// Redirect to `url` with a 303 See Other.
    pub fn redirect(&mut self, url: &str) {
        self.status = 303;
        self.set_header("Location", url);
    }

    /// Apply the pre-send defaults.
    ///
    /// Keep-alive exchanges advertise `Connection: keep-alive`; close is
    /// implied by the header's absence. An unset `Content-Type` becomes
    /// `text/html`.
    pub fn finalize(&mut self, keep_alive: bool) {
        if keep_alive {
            self.set_header("Connection", "keep-alive");
        }
        if !self.headers.contains_key("Content-Type") {
            self.set_header("Content-Type", "text/html");
        }
    }

    /// Serialize the response to wire bytes.
    ///
    /// Order: status line, headers in map order, a synthesized
    /// `Content-Length` when none was set, one `Set-Cookie` line per cookie
    /// (suppressed when an explicit `Set-Cookie` header exists), blank line,
    /// body.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256 + self.body.len());

        let status_line = format!(
            "HTTP/{}.{} {} {}\r\n",
            self.major,
            self.minor,
            self.status,
            reason_phrase(self.status)
        );
        buf.extend_from_slice(status_line.as_bytes());

        for (k, v) in &self.headers {
            buf.extend_from_slice(k.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(v.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        if !self.headers.contains_key("Content-Length") {
            buf.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }

        if !self.headers.contains_key("Set-Cookie") {
            for cookie in self.cookies.values() {
                buf.extend_from_slice(b"Set-Cookie: ");
                buf.extend_from_slice(cookie.serialize().as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(&self.body);

        buf
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
