//! # HTTP Request Decoding
//! src/http/request.rs
//!
//! A bounded HTTP/1.1 request-line and header decoder working directly on a
//! buffered byte stream. The request body, if any, is never read.
//!
//! ## Wire format
//!
//! ```text
//! GET /static/index.html?v=2 HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! User-Agent: curl/8.5.0\r\n
//! \r\n
//! ```
//!
//! Both limits (request-line length, total header-block size) are enforced
//! while reading, so a hostile or broken client can never force unbounded
//! buffering.

use std::collections::HashMap;
use std::io::{self, BufRead, Read};

/// A decoded request: method, raw path, version and header map.
#[derive(Debug, Clone)]
pub struct Request {
    /// Uppercased method token ("GET", "HEAD", ...)
    method: String,

    /// Raw request path, query string included
    path: String,

    /// Protocol version string as sent ("HTTP/1.1")
    version: String,

    /// Headers, keys lowercased; the last occurrence of a duplicate key wins
    headers: HashMap<String, String>,
}

/// Failures while decoding a request from the stream.
#[derive(Debug)]
pub enum RequestError {
    /// The peer closed the connection before sending anything.
    EmptyRequest,

    /// The request line exceeded the configured maximum length.
    RequestLineTooLong,

    /// The request line did not split into method, path and version.
    BadRequestLine(String),

    /// The accumulated header block exceeded the configured maximum size.
    HeadersTooLarge,

    /// Timeout, reset or any other I/O fault while reading.
    Transport(io::Error),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::EmptyRequest => write!(f, "empty request"),
            RequestError::RequestLineTooLong => write!(f, "request line too long"),
            RequestError::BadRequestLine(line) => write!(f, "bad request line: {:?}", line),
            RequestError::HeadersTooLarge => write!(f, "headers too large"),
            RequestError::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<io::Error> for RequestError {
    fn from(e: io::Error) -> Self {
        RequestError::Transport(e)
    }
}

/// Decodes a single byte as Latin-1. Start lines and headers are
/// ASCII/Latin-1 by specification, so this step can never fail; all
/// validation lives in the splitting logic instead.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Reads one line (up to and including a `\n`) without consuming more than
/// `limit` bytes from the stream.
fn read_line_bounded<R: BufRead>(reader: &mut R, limit: usize) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    reader
        .by_ref()
        .take(limit as u64)
        .read_until(b'\n', &mut line)?;
    Ok(line)
}

impl Request {
    /// Decodes a request from `reader` under the two configured limits.
    ///
    /// Reads the request line (bounded to `max_request_line + 1` bytes so an
    /// over-long line is detected rather than truncated), then header lines
    /// until a bare `\r\n`/`\n` or end of stream, accumulating at most
    /// `max_headers` bytes.
    pub fn parse<R: BufRead>(
        reader: &mut R,
        max_request_line: usize,
        max_headers: usize,
    ) -> Result<Self, RequestError> {
        // Request line
        let request_line = read_line_bounded(reader, max_request_line + 1)?;
        if request_line.is_empty() {
            return Err(RequestError::EmptyRequest);
        }
        if request_line.len() > max_request_line {
            return Err(RequestError::RequestLineTooLong);
        }

        let line = latin1(&request_line);
        let line = line.trim_end_matches(['\r', '\n']);
        let mut parts = line.splitn(3, ' ');
        let (method, path, version) = match (parts.next(), parts.next(), parts.next()) {
            (Some(m), Some(p), Some(v)) => (m, p, v),
            _ => return Err(RequestError::BadRequestLine(line.to_string())),
        };

        // Header block: one line at a time until the blank separator line or
        // end of stream, counting every byte read against the limit.
        let mut header_lines: Vec<Vec<u8>> = Vec::new();
        let mut total = 0usize;
        loop {
            let line = read_line_bounded(reader, max_headers + 1)?;
            if line.is_empty() {
                break;
            }
            total += line.len();
            if line == b"\r\n" || line == b"\n" {
                break;
            }
            if total > max_headers {
                return Err(RequestError::HeadersTooLarge);
            }
            header_lines.push(line);
        }

        let mut headers = HashMap::new();
        for raw in header_lines {
            let text = latin1(&raw);
            let text = text.trim_end_matches(['\r', '\n']);
            // A line without a colon is tolerated and skipped; only the
            // method, path and a few known headers are consulted downstream.
            if let Some((key, value)) = text.split_once(':') {
                headers.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }

        Ok(Request {
            method: method.to_uppercase(),
            path: path.to_string(),
            version: version.to_string(),
            headers,
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Looks up a header by its lowercased key.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }
}
