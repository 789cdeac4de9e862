//! # UDP Health Responder
//! src/server/udp.rs
//!
//! Stateless request/reply loop over one datagram socket: a trimmed,
//! case-insensitive `PING` gets `PONG <UTC timestamp>Z\n` back; every other
//! payload is ignored so the responder never reflects arbitrary input and
//! stays quiet under port-scan noise.
//!
//! Cancellation is cooperative: the receive call carries a 1-second timeout
//! and the shutdown flag is polled between reads.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use log::{debug, error, info};

use crate::config::Config;
use crate::shutdown::ShutdownFlag;

/// Poll interval for the cancellation check between receives.
const RECV_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Largest datagram the responder will look at.
const MAX_DATAGRAM_BYTES: usize = 4096;

/// UDP liveness responder. Owns its socket from bind to drop.
pub struct UdpHealthServer {
    socket: UdpSocket,
    local_addr: SocketAddr,
}

impl UdpHealthServer {
    /// Binds `host:udp_port` and arms the receive timeout used as the
    /// shutdown poll interval.
    pub fn start(config: &Config) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(config.udp_address())?;
        socket.set_read_timeout(Some(RECV_POLL_INTERVAL))?;
        let local_addr = socket.local_addr()?;
        info!("UDP health server listening on {}", local_addr);
        Ok(Self { socket, local_addr })
    }

    /// The actually bound address (useful when configured with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves datagrams until `shutdown` is set or the socket fails.
    /// Each iteration is independent; a failed reply never ends the loop.
    pub fn run(&self, shutdown: &ShutdownFlag) {
        let mut buf = [0u8; MAX_DATAGRAM_BYTES];
        while !shutdown.is_set() {
            let (len, peer) = match self.socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    continue;
                }
                Err(e) => {
                    error!("UDP receive failed: {}", e);
                    break;
                }
            };

            // Invalid UTF-8 bytes are discarded, not rejected: the lossy
            // decode substitutes U+FFFD, which is then stripped so a PING
            // with trailing junk still counts.
            let payload = String::from_utf8_lossy(&buf[..len])
                .chars()
                .filter(|&c| c != char::REPLACEMENT_CHARACTER)
                .collect::<String>()
                .trim()
                .to_uppercase();
            if payload.is_empty() {
                // Empty datagrams are common with some nc variants.
                continue;
            }
            if payload == "PING" {
                let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
                let reply = format!("PONG {}\n", ts);
                if let Err(e) = self.socket.send_to(reply.as_bytes(), peer) {
                    debug!("failed to send UDP reply to {}: {}", peer, e);
                }
            } else {
                debug!("ignoring unrecognized datagram from {}", peer);
            }
        }
        info!("UDP health server stopped");
    }
}
