//! # pulse_server
//! src/lib.rs
//!
//! A minimal HTTP/1.1 server (static files + JSON health endpoint) running
//! alongside an independent UDP liveness responder. Both are driven from
//! one shared configuration and one cooperative shutdown flag.
//!
//! ## Architecture
//!
//! - `http`: bounded request decoding and response encoding over raw bytes
//! - `router`: pure (method, path) -> response dispatch
//! - `server`: TCP accept/worker loops and the UDP datagram loop
//! - `config`: env-var configuration with CLI override
//! - `shutdown`: signal-to-flag wiring
//! - `logging`: console logger setup
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pulse_server::config::Config;
//! use pulse_server::server::HttpServer;
//!
//! let config = Arc::new(Config::default());
//! let server = HttpServer::start(config).expect("bind failed");
//! // ... later ...
//! server.stop();
//! ```

pub mod config;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
pub mod shutdown;

pub use config::Config;
pub use http::{Request, RequestError, Response, StatusCode};
pub use server::{HttpServer, UdpHealthServer};
pub use shutdown::ShutdownFlag;
