//! # Network Servers
//! src/server/mod.rs
//!
//! The two serving components: the thread-per-connection HTTP server and
//! the UDP health responder. They share nothing but the read-only
//! configuration and the shutdown flag.

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

pub mod tcp;
pub mod udp;

pub use tcp::HttpServer;
pub use udp::UdpHealthServer;

/// Waits up to `wait` for a thread to finish, then joins it. A thread that
/// outlives the deadline is left running (detached), never killed.
///
/// `JoinHandle` offers no timed join, so this polls `is_finished`.
pub fn join_bounded(handle: JoinHandle<()>, wait: Duration) {
    let deadline = Instant::now() + wait;
    while !handle.is_finished() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    if handle.is_finished() {
        let _ = handle.join();
    }
}
