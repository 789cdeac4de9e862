//! # Request Routing
//! src/router/mod.rs
//!
//! Pure dispatch from (method, path) to a [`Response`]:
//!
//! ```text
//! /            -> /static/index.html
//! /health      -> 200 JSON {"status": "ok", "time": <UTC ISO-8601>}
//! /static/<p>  -> file under the configured static root, or 404
//! *            -> 404
//! ```
//!
//! HEAD requests reuse the GET dispatch; the body is dropped while
//! `Content-Length` keeps reporting the GET body length.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use log::debug;
use serde::Serialize;

use crate::config::Config;
use crate::http::{Response, StatusCode};

/// Body of the `/health` endpoint.
#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    time: String,
}

/// Content types for the file extensions the server knows about.
/// Anything else is served as an opaque byte stream.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn not_found() -> Response {
    Response::text(StatusCode::NotFound, "Not Found")
}

/// Routes a request to its response. Filesystem reads for `/static/` paths
/// are the only side effect; a missing file is a normal outcome (404), not
/// an error.
pub fn route(method: &str, path: &str, config: &Config) -> Response {
    let response = dispatch(path, config);
    if method == "HEAD" {
        response.into_head()
    } else {
        response
    }
}

fn dispatch(path: &str, config: &Config) -> Response {
    // Query strings never influence routing.
    let path = path.split('?').next().unwrap_or(path);
    let path = if path == "/" { "/static/index.html" } else { path };

    if path == "/health" {
        let payload = HealthPayload {
            status: "ok",
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        };
        let body = serde_json::to_vec(&payload).expect("health payload serializes");
        return Response::new(StatusCode::Ok)
            .with_header("Content-Type", "application/json; charset=utf-8")
            .with_body_bytes(body);
    }

    if let Some(rel) = path.strip_prefix("/static/") {
        // Best-effort traversal filter: every literal ".." is removed from
        // the relative part before joining. Kept bug-compatible on purpose;
        // the canonicalize-and-verify alternative is a documented follow-up.
        let safe_rel = rel.replace("..", "");
        let file_path = Path::new(&config.static_dir).join(&safe_rel);
        return match std::fs::read(&file_path) {
            Ok(data) => Response::new(StatusCode::Ok)
                .with_header("Content-Type", content_type_for(&file_path))
                .with_body_bytes(data),
            Err(e) => {
                debug!("static read {:?} failed: {}", file_path, e);
                not_found()
            }
        };
    }

    not_found()
}
