//! URL model and percent encoding.
//!
//! Only `http` and `https` URLs are representable; constructing anything
//! else fails. The percent codec follows the form-encoding convention:
//! space maps to `+` and unreserved characters (`-`, `_`, `.`, `~`,
//! alphanumerics) pass through untouched.

use std::collections::HashMap;
use std::fmt;

/// Errors produced when constructing a [`Url`].
#[derive(Debug, PartialEq, Eq)]
pub enum UrlError {
    /// The schema is not `http` or `https`.
    UnsupportedSchema,
    /// The input could not be parsed as an absolute URL.
    Malformed,
}

impl fmt::Display for UrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSchema => write!(f, "schema must be http or https"),
            Self::Malformed => write!(f, "malformed URL"),
        }
    }
}

impl std::error::Error for UrlError {}

/// A parsed URL.
///
/// The query string is exposed as a decoded key/value map. Serializing via
/// `Display` re-encodes the components; the port is omitted when it is the
/// default 80.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub schema: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub queries: HashMap<String, String>,
    pub fragment: Option<String>,
}

impl Url {
    /// Parse an absolute URL.
    ///
    /// The schema is matched case-insensitively; anything other than
    /// `http`/`https` is rejected with [`UrlError::UnsupportedSchema`].
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let parsed = url::Url::parse(input).map_err(|_| UrlError::Malformed)?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(UrlError::UnsupportedSchema);
        }

        let host = parsed
            .host_str()
            .ok_or(UrlError::Malformed)?
            .to_string();

        let username = match parsed.username() {
            "" => None,
            u => Some(u.to_string()),
        };

        let queries = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self {
            schema: parsed.scheme().to_string(),
            username,
            password: parsed.password().map(str::to_string),
            host,
            port: parsed.port().unwrap_or(80),
            path: parsed.path().to_string(),
            queries,
            fragment: parsed.fragment().map(str::to_string),
        })
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.schema)?;

        if let Some(username) = &self.username {
            write!(f, "{username}")?;
            if let Some(password) = &self.password {
                write!(f, ":{password}")?;
            }
            write!(f, "@")?;
        }

        write!(f, "{}", self.host)?;
        if self.port != 80 {
            write!(f, ":{}", self.port)?;
        }
        write!(f, "{}", self.path)?;

        if !self.queries.is_empty() {
            let mut first = true;
            for (k, v) in &self.queries {
                write!(f, "{}{}={}", if first { '?' } else { '&' }, encode(k), encode(v))?;
                first = false;
            }
        }

        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }

        Ok(())
    }
}

static HEX_CODES: &[u8; 16] = b"0123456789ABCDEF";

fn from_hex(c: u8) -> u8 {
    if c.is_ascii_digit() {
        c - b'0'
    } else {
        c.to_ascii_uppercase() - b'A' + 10
    }
}

/// Percent-encode a string, mapping space to `+`.
pub fn encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for b in input.bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(HEX_CODES[(b >> 4) as usize] as char);
                out.push(HEX_CODES[(b & 15) as usize] as char);
            }
        }
    }

    out
}

/// Decode a percent-encoded string, mapping `+` back to space.
///
/// A truncated escape at the end of input is dropped rather than rejected.
pub fn decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if i + 2 < bytes.len() {
                    out.push((from_hex(bytes[i + 1]) << 4) | from_hex(bytes[i + 2]));
                    i += 3;
                } else {
                    i += 1;
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
