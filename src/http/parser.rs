//! Incremental HTTP/1.x request parser.
//!
//! The parser is a state machine fed raw socket chunks. Each call to
//! [`RequestParser::feed`] consumes whatever it can and returns the parse
//! events produced so far; callers apply those events to a
//! [`Request`](crate::http::request::Request) as they arrive. Nothing
//! requires the whole message to be buffered before partial results appear.
//!
//! Bodies are framed by `Content-Length` only; chunked transfer encoding is
//! not supported.

use crate::http::request::Method;
use bytes::{Buf, BytesMut};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidContentLength,
    ProtocolViolation,
}

/// Events emitted while consuming a request off the wire.
///
/// `HeaderField`/`HeaderValue` strictly alternate for well-formed input; a
/// header line without a `:` emits a lone `HeaderField`, which request
/// assembly rejects as a protocol violation.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseEvent {
    MessageBegin,
    Url(Vec<u8>),
    HeaderField(Vec<u8>),
    HeaderValue(Vec<u8>),
    HeadersComplete {
        method: Method,
        major: u8,
        minor: u8,
    },
    Body(Vec<u8>),
    MessageComplete,
}

#[derive(Clone, Copy)]
enum State {
    Idle,
    RequestLine,
    Headers {
        method: Method,
        major: u8,
        minor: u8,
    },
    Body {
        remaining: usize,
    },
}

/// Streaming request parser for one connection.
///
/// After `MessageComplete` the parser returns to idle with any leftover
/// bytes retained, so a keep-alive connection can parse the next request
/// from the same buffer.
pub struct RequestParser {
    buf: BytesMut,
    state: State,
    content_length: usize,
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(4096),
            state: State::Idle,
            content_length: 0,
        }
    }

    /// Append `bytes` and drive the state machine as far as it will go.
    ///
    /// An empty `bytes` slice is valid and processes leftover buffered
    /// input, e.g. a pipelined request left behind by the previous message.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<ParseEvent>, ParseError> {
        self.buf.extend_from_slice(bytes);

        let mut events = Vec::new();

        loop {
            match self.state {
                State::Idle => {
                    if self.buf.is_empty() {
                        break;
                    }
                    self.content_length = 0;
                    self.state = State::RequestLine;
                    events.push(ParseEvent::MessageBegin);
                }

                State::RequestLine => {
                    let Some(line) = self.take_line() else {
                        break;
                    };
                    let (method, url, major, minor) = parse_request_line(&line)?;
                    events.push(ParseEvent::Url(url));
                    self.state = State::Headers {
                        method,
                        major,
                        minor,
                    };
                }

                State::Headers {
                    method,
                    major,
                    minor,
                } => {
                    let Some(line) = self.take_line() else {
                        break;
                    };

                    if line.is_empty() {
                        events.push(ParseEvent::HeadersComplete {
                            method,
                            major,
                            minor,
                        });
                        if self.content_length == 0 {
                            events.push(ParseEvent::MessageComplete);
                            self.state = State::Idle;
                            // Stop at the message boundary; a pipelined
                            // request stays buffered for the next feed.
                            break;
                        }
                        self.state = State::Body {
                            remaining: self.content_length,
                        };
                        continue;
                    }

                    match line.iter().position(|&b| b == b':') {
                        Some(pos) => {
                            let field = trim_bytes(&line[..pos]);
                            let value = trim_bytes(&line[pos + 1..]);

                            if field.eq_ignore_ascii_case(b"content-length") {
                                self.content_length = std::str::from_utf8(&value)
                                    .ok()
                                    .and_then(|v| v.parse::<usize>().ok())
                                    .ok_or(ParseError::InvalidContentLength)?;
                            }

                            events.push(ParseEvent::HeaderField(field));
                            events.push(ParseEvent::HeaderValue(value));
                        }
                        None => {
                            // No value on this line; assembly treats the
                            // resulting field/field sequence as fatal.
                            events.push(ParseEvent::HeaderField(line));
                        }
                    }
                }

                State::Body { remaining } => {
                    if self.buf.is_empty() {
                        break;
                    }
                    let n = remaining.min(self.buf.len());
                    let chunk = self.buf.split_to(n).to_vec();
                    events.push(ParseEvent::Body(chunk));

                    if n == remaining {
                        events.push(ParseEvent::MessageComplete);
                        self.state = State::Idle;
                        // Stop at the message boundary; a pipelined
                        // request stays buffered for the next feed.
                        break;
                    }
                    self.state = State::Body {
                        remaining: remaining - n,
                    };
                }
            }
        }

        Ok(events)
    }

    /// Take one CRLF-terminated line off the buffer, without the terminator.
    fn take_line(&mut self) -> Option<Vec<u8>> {
        let pos = self.buf.windows(2).position(|w| w == b"\r\n")?;
        let line = self.buf.split_to(pos).to_vec();
        self.buf.advance(2);
        Some(line)
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_bytes(bytes: &[u8]) -> Vec<u8> {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |e| e + 1);
    bytes[start..end].to_vec()
}

fn parse_request_line(line: &[u8]) -> Result<(Method, Vec<u8>, u8, u8), ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidRequest)?;
    let mut parts = line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;

    let version = version
        .strip_prefix("HTTP/")
        .ok_or(ParseError::InvalidRequest)?;
    let (major, minor) = version.split_once('.').ok_or(ParseError::InvalidRequest)?;
    let major = major.parse::<u8>().map_err(|_| ParseError::InvalidRequest)?;
    let minor = minor.parse::<u8>().map_err(|_| ParseError::InvalidRequest)?;

    Ok((method, target.as_bytes().to_vec(), major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let mut parser = RequestParser::new();
        let events = parser
            .feed(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n")
            .unwrap();

        assert_eq!(
            events,
            vec![
                ParseEvent::MessageBegin,
                ParseEvent::Url(b"/index.html".to_vec()),
                ParseEvent::HeaderField(b"Host".to_vec()),
                ParseEvent::HeaderValue(b"example.com".to_vec()),
                ParseEvent::HeadersComplete {
                    method: Method::GET,
                    major: 1,
                    minor: 1
                },
                ParseEvent::MessageComplete,
            ]
        );
    }

    #[test]
    fn parse_across_single_byte_feeds() {
        let raw = b"POST /api HTTP/1.0\r\nContent-Length: 5\r\n\r\nhello";
        let mut parser = RequestParser::new();
        let mut events = Vec::new();

        for b in raw {
            events.extend(parser.feed(&[*b]).unwrap());
        }

        assert!(matches!(events.last(), Some(ParseEvent::MessageComplete)));
        let body: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                ParseEvent::Body(chunk) => Some(chunk.clone()),
                _ => None,
            })
            .flatten()
            .collect();
        assert_eq!(body, b"hello".to_vec());
    }

    #[test]
    fn pipelined_requests_parse_one_message_per_feed() {
        let mut parser = RequestParser::new();

        let first = parser
            .feed(b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n")
            .unwrap();
        assert!(first.contains(&ParseEvent::Url(b"/a".to_vec())));
        assert!(matches!(first.last(), Some(ParseEvent::MessageComplete)));
        assert!(!first.contains(&ParseEvent::Url(b"/b".to_vec())));

        // The second request is parsed from the retained buffer.
        let second = parser.feed(&[]).unwrap();
        assert!(second.contains(&ParseEvent::Url(b"/b".to_vec())));
        assert!(matches!(second.last(), Some(ParseEvent::MessageComplete)));
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut parser = RequestParser::new();
        let result = parser.feed(b"BOGUS / HTTP/1.1\r\n\r\n");
        assert_eq!(result, Err(ParseError::InvalidMethod));
    }
}
