//! # HTTP Response Building
//! src/http/response.rs
//!
//! Builder for HTTP/1.1 responses and the encoder that turns one into raw
//! bytes for the socket.
//!
//! ## Wire format
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain; charset=utf-8\r\n
//! Content-Length: 5\r\n
//! Connection: close\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Example
//!
//! ```
//! use pulse_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain; charset=utf-8")
//!     .with_body("hello");
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::StatusCode;

/// A complete response: status, headers in insertion order, body bytes.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    /// Kept as a Vec so headers are encoded in the order they were set.
    headers: Vec<(String, String)>,

    body: Vec<u8>,
}

impl Response {
    /// Creates an empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Convenience constructor for terse plain-text responses
    /// ("Not Found", "Bad Request", ...).
    pub fn text(status: StatusCode, message: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(message)
    }

    /// Sets a header, replacing any existing entry with the same
    /// case-insensitive name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    /// Mutable variant of [`Response::with_header`].
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some(entry) = self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            entry.1 = value.to_string();
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }

    /// Sets the body from a string.
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Sets the body from raw bytes (static file contents, images, ...).
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Converts a GET response into its HEAD counterpart: the body is
    /// dropped, but `Content-Length` still reports what a GET would have
    /// returned.
    pub fn into_head(mut self) -> Self {
        if self.header("Content-Length").is_none() {
            let length = self.body.len().to_string();
            self.set_header("Content-Length", &length);
        }
        self.body.clear();
        self
    }

    /// Encodes the response.
    ///
    /// The body length is always known up front (no streaming), so a
    /// missing `Content-Length` is computed unconditionally. A missing
    /// `Connection` header becomes `Connection: close`; the server never
    /// reuses a connection and the peer must not wait for a keep-alive.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        let status_line = format!("HTTP/1.1 {}\r\n", self.status);
        result.extend_from_slice(status_line.as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }
        if self.header("Content-Length").is_none() {
            result.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }
        if self.header("Connection").is_none() {
            result.extend_from_slice(b"Connection: close\r\n");
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);
        result
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
