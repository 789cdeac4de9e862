//! # Entry Point
//! src/main.rs
//!
//! Wires configuration, logging and signal handling, starts the selected
//! servers and blocks polling the shutdown flag until it is set.

use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{error, info};

use pulse_server::config::Config;
use pulse_server::server::{join_bounded, HttpServer, UdpHealthServer};
use pulse_server::shutdown::{self, ShutdownFlag};
use pulse_server::logging;

/// Interval at which the main thread polls the shutdown flag.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(200);

fn main() {
    let config = Config::new();

    if let Err(e) = logging::init(&config.log_level) {
        eprintln!("failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = config.validate() {
        error!("invalid configuration: {}", e);
        process::exit(1);
    }

    let shutdown = ShutdownFlag::new();
    if let Err(e) = shutdown::install_signal_handlers(&shutdown) {
        error!("failed to install signal handlers: {}", e);
        process::exit(1);
    }

    let config = Arc::new(config);

    let http_server = if config.run_tcp() {
        match HttpServer::start(Arc::clone(&config)) {
            Ok(server) => Some(server),
            Err(e) => {
                error!("failed to start HTTP server on {}: {}", config.tcp_address(), e);
                process::exit(1);
            }
        }
    } else {
        None
    };

    let udp_thread = if config.run_udp() {
        let server = match UdpHealthServer::start(&config) {
            Ok(server) => server,
            Err(e) => {
                error!("failed to start UDP server on {}: {}", config.udp_address(), e);
                process::exit(1);
            }
        };
        let flag = shutdown.clone();
        Some(thread::spawn(move || server.run(&flag)))
    } else {
        None
    };

    info!("servers up, send SIGINT or SIGTERM to stop");
    while !shutdown.is_set() {
        thread::sleep(SHUTDOWN_POLL_INTERVAL);
    }

    if let Some(server) = http_server {
        server.stop();
    }
    if let Some(handle) = udp_thread {
        join_bounded(handle, Duration::from_secs(2));
    }
    info!("exited cleanly");
}
