//! # Server Configuration
//! src/config.rs
//!
//! Runtime configuration for both servers, sourced from environment
//! variables with CLI-flag override.
//!
//! ## Examples
//!
//! ### CLI
//! ```bash
//! ./pulse_server --tcp-port 8080 --udp-port 9999 --static-dir ./static
//! ```
//!
//! ### Environment variables
//! ```bash
//! TCP_PORT=8080 UDP_PORT=9999 STATIC_DIR=./static ./pulse_server
//! ```

use clap::Parser;

/// Immutable configuration shared read-only by every server component.
#[derive(Debug, Clone, Parser)]
#[command(name = "pulse_server")]
#[command(about = "Static-file HTTP server + UDP liveness responder")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Host/IP both servers bind to
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port for the HTTP server
    #[arg(long = "tcp-port", default_value = "8080", env = "TCP_PORT")]
    pub tcp_port: u16,

    /// Port for the UDP health responder
    #[arg(long = "udp-port", default_value = "9999", env = "UDP_PORT")]
    pub udp_port: u16,

    /// Per-connection read timeout in seconds
    #[arg(long = "read-timeout", default_value = "5", env = "READ_TIMEOUT")]
    pub read_timeout_secs: u64,

    /// Maximum accepted length of the HTTP request line, in bytes
    #[arg(
        long = "max-request-line-bytes",
        default_value = "4096",
        env = "MAX_REQUEST_LINE_BYTES"
    )]
    pub max_request_line_bytes: usize,

    /// Maximum accepted size of the HTTP header block, in bytes
    #[arg(long = "max-header-bytes", default_value = "16384", env = "MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,

    /// Directory served under /static/
    #[arg(long = "static-dir", default_value = "static", env = "STATIC_DIR")]
    pub static_dir: String,

    /// Log level: debug, info, warn, error
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Run only the HTTP server
    #[arg(long, group = "mode")]
    pub tcp: bool,

    /// Run only the UDP health responder
    #[arg(long, group = "mode")]
    pub udp: bool,

    /// Run both servers (the default when no mode flag is given)
    #[arg(long, group = "mode")]
    pub both: bool,
}

impl Config {
    /// Parses configuration from CLI arguments and the environment.
    pub fn new() -> Self {
        Config::parse()
    }

    /// Bind address for the HTTP listener (`host:tcp_port`).
    pub fn tcp_address(&self) -> String {
        format!("{}:{}", self.host, self.tcp_port)
    }

    /// Bind address for the UDP socket (`host:udp_port`).
    pub fn udp_address(&self) -> String {
        format!("{}:{}", self.host, self.udp_port)
    }

    /// Whether the HTTP server should run under the selected mode.
    pub fn run_tcp(&self) -> bool {
        self.tcp || self.both || !self.udp
    }

    /// Whether the UDP responder should run under the selected mode.
    pub fn run_udp(&self) -> bool {
        self.udp || self.both || !self.tcp
    }

    /// Validates numeric fields. Every limit must be positive; a zero
    /// value would disable the corresponding bound entirely.
    pub fn validate(&self) -> Result<(), String> {
        if self.read_timeout_secs == 0 {
            return Err("read timeout must be > 0 seconds".to_string());
        }
        if self.max_request_line_bytes == 0 {
            return Err("max request line bytes must be > 0".to_string());
        }
        if self.max_header_bytes == 0 {
            return Err("max header bytes must be > 0".to_string());
        }
        if self.static_dir.is_empty() {
            return Err("static dir must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            tcp_port: 8080,
            udp_port: 9999,
            read_timeout_secs: 5,
            max_request_line_bytes: 4096,
            max_header_bytes: 16 * 1024,
            static_dir: "static".to_string(),
            log_level: "info".to_string(),
            tcp: false,
            udp: false,
            both: false,
        }
    }
}
