//! # TCP Connection Server
//! src/server/tcp.rs
//!
//! Thread-per-connection HTTP server over blocking sockets. One dedicated
//! thread accepts connections; every accepted connection gets its own
//! worker thread with no admission limit, so under load thread count grows
//! with concurrency. The accept loop never waits on workers.
//!
//! Lifecycle: `start` binds and begins accepting; `stop` flips the closing
//! flag, unblocks the accept call and waits a bounded interval for workers.
//! A stopped server cannot be restarted.

use std::io::{BufReader, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::Config;
use crate::http::{Request, RequestError, Response, StatusCode};
use crate::router;
use crate::server::join_bounded;

/// How long `stop` waits for each still-running connection worker.
const WORKER_STOP_WAIT: Duration = Duration::from_secs(1);

/// How long `stop` waits for the accept thread after the wake-up poke.
const ACCEPT_STOP_WAIT: Duration = Duration::from_secs(2);

/// The HTTP server. Owns the listening socket for its whole lifetime; the
/// socket is closed exactly once, when the accept loop exits.
pub struct HttpServer {
    local_addr: SocketAddr,
    closing: Arc<AtomicBool>,
    workers: Arc<Mutex<Vec<JoinHandle<()>>>>,
    accept_handle: JoinHandle<()>,
}

impl HttpServer {
    /// Binds `host:tcp_port` and starts the accept loop on its own thread.
    pub fn start(config: Arc<Config>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.tcp_address())?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server listening on {}", local_addr);

        let closing = Arc::new(AtomicBool::new(false));
        let workers = Arc::new(Mutex::new(Vec::new()));
        let accept_handle = thread::Builder::new()
            .name("http-accept".to_string())
            .spawn({
                let closing = Arc::clone(&closing);
                let workers = Arc::clone(&workers);
                move || Self::accept_loop(listener, config, closing, workers)
            })?;

        Ok(Self {
            local_addr,
            closing,
            workers,
            accept_handle,
        })
    }

    /// The actually bound address (useful when configured with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn accept_loop(
        listener: TcpListener,
        config: Arc<Config>,
        closing: Arc<AtomicBool>,
        workers: Arc<Mutex<Vec<JoinHandle<()>>>>,
    ) {
        loop {
            let (stream, peer) = match listener.accept() {
                Ok(pair) => pair,
                Err(e) => {
                    if !closing.load(Ordering::SeqCst) {
                        error!("accept failed: {}", e);
                    }
                    break;
                }
            };
            if closing.load(Ordering::SeqCst) {
                // The wake-up connection made by stop().
                break;
            }
            debug!("connection from {}", peer);

            let handle = Self::spawn_worker(stream, peer, Arc::clone(&config));

            let mut workers = workers.lock().unwrap();
            workers.retain(|h| !h.is_finished());
            workers.push(handle);
        }
        // The listener drops here, closing the socket exactly once.
        debug!("accept loop exited");
    }

    /// Dispatches one accepted connection to its own OS thread. Unbounded
    /// on purpose; a pooled dispatcher would only need to replace this
    /// seam, the protocol handling below stays untouched.
    fn spawn_worker(stream: TcpStream, peer: SocketAddr, config: Arc<Config>) -> JoinHandle<()> {
        thread::spawn(move || Self::handle_connection(stream, peer, &config))
    }

    /// Runs one connection to completion. Every failure is contained here:
    /// the worker logs it, attempts a 400 and always closes the socket.
    fn handle_connection(stream: TcpStream, peer: SocketAddr, config: &Config) {
        if let Err(e) = Self::serve(&stream, config) {
            match &e {
                RequestError::Transport(err) => warn!("transport error from {}: {}", peer, err),
                _ => warn!("bad request from {}: {}", peer, e),
            }
            // Best-effort error answer; a second failure is swallowed.
            let fallback = Response::text(StatusCode::BadRequest, "Bad Request");
            let _ = (&stream).write_all(&fallback.to_bytes());
        }
        let _ = stream.shutdown(Shutdown::Both);
    }

    fn serve(stream: &TcpStream, config: &Config) -> Result<(), RequestError> {
        stream.set_read_timeout(Some(Duration::from_secs(config.read_timeout_secs)))?;

        let mut reader = BufReader::new(stream);
        let request = Request::parse(
            &mut reader,
            config.max_request_line_bytes,
            config.max_header_bytes,
        )?;
        debug!("{} {} {}", request.method(), request.path(), request.version());

        let response = match request.method() {
            "GET" | "HEAD" => router::route(request.method(), request.path(), config),
            _ => Response::text(StatusCode::MethodNotAllowed, "Method Not Allowed"),
        };

        let mut writer = stream;
        writer.write_all(&response.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Stops accepting, closes the listening socket and waits a bounded
    /// interval for in-flight connections. Workers still running after the
    /// wait are abandoned, not killed.
    pub fn stop(self) {
        self.closing.store(true, Ordering::SeqCst);

        // accept() blocks until a connection arrives; a listener cannot be
        // closed from another thread, so poke it with a throwaway
        // connection. The loop sees the closing flag and exits. If the poke
        // fails the accept thread may still be blocked, so its join is
        // bounded too.
        if let Err(e) = TcpStream::connect_timeout(&self.wake_addr(), Duration::from_millis(500)) {
            warn!("wake-up connection to {} failed: {}", self.wake_addr(), e);
        }
        join_bounded(self.accept_handle, ACCEPT_STOP_WAIT);

        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.workers.lock().unwrap());
        for handle in handles {
            join_bounded(handle, WORKER_STOP_WAIT);
        }
        info!("HTTP server stopped");
    }

    /// Address the wake-up connection should target. A listener bound to
    /// the unspecified address is reachable via loopback on the same port.
    fn wake_addr(&self) -> SocketAddr {
        if self.local_addr.ip().is_unspecified() {
            let loopback: IpAddr = match self.local_addr.ip() {
                IpAddr::V4(_) => Ipv4Addr::LOCALHOST.into(),
                IpAddr::V6(_) => Ipv6Addr::LOCALHOST.into(),
            };
            SocketAddr::new(loopback, self.local_addr.port())
        } else {
            self.local_addr
        }
    }
}
