//! End-to-end tests: both servers started in-process on ephemeral ports,
//! exercised over real sockets.

use std::fs;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, UdpSocket};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use pulse_server::config::Config;
use pulse_server::server::{HttpServer, UdpHealthServer};
use pulse_server::shutdown::ShutdownFlag;

struct TestEnv {
    http: Option<HttpServer>,
    http_addr: SocketAddr,
    udp_addr: SocketAddr,
    shutdown: ShutdownFlag,
    udp_thread: Option<thread::JoinHandle<()>>,
    _root: TempDir,
}

impl TestEnv {
    fn start() -> Self {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("index.html"), b"<h1>it works</h1>").unwrap();
        fs::write(root.path().join("hello.txt"), b"hello from disk").unwrap();
        fs::write(root.path().join("data.json"), br#"{"k": 1}"#).unwrap();

        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.tcp_port = 0;
        config.udp_port = 0;
        config.read_timeout_secs = 2;
        config.static_dir = root.path().to_str().unwrap().to_string();
        let config = Arc::new(config);

        let http = HttpServer::start(Arc::clone(&config)).expect("http bind");
        let http_addr = http.local_addr();

        let udp = Arc::new(UdpHealthServer::start(&config).expect("udp bind"));
        let udp_addr = udp.local_addr();
        let shutdown = ShutdownFlag::new();
        let udp_thread = thread::spawn({
            let udp = Arc::clone(&udp);
            let shutdown = shutdown.clone();
            move || udp.run(&shutdown)
        });

        TestEnv {
            http: Some(http),
            http_addr,
            udp_addr,
            shutdown,
            udp_thread: Some(udp_thread),
            _root: root,
        }
    }

    fn request(&self, raw: &str) -> String {
        let mut stream = TcpStream::connect(self.http_addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        stream.write_all(raw.as_bytes()).unwrap();
        stream.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn get(&self, path: &str) -> String {
        self.request(&format!("GET {} HTTP/1.1\r\n\r\n", path))
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        self.shutdown.set();
        if let Some(http) = self.http.take() {
            http.stop();
        }
        if let Some(handle) = self.udp_thread.take() {
            let _ = handle.join();
        }
    }
}

fn body_of(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or("")
}

#[test]
fn health_returns_ok_json() {
    let env = TestEnv::start();
    let response = env.get("/health");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{}", response);

    let body: serde_json::Value = serde_json::from_str(body_of(&response)).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["time"].as_str().unwrap().contains('T'));
}

#[test]
fn unknown_route_returns_404_not_found() {
    let env = TestEnv::start();
    let response = env.get("/nope");
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{}", response);
    assert_eq!(body_of(&response), "Not Found");
}

#[test]
fn post_returns_405() {
    let env = TestEnv::start();
    let response = env.request("POST / HTTP/1.1\r\n\r\n");
    assert!(
        response.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"),
        "{}",
        response
    );
}

#[test]
fn oversized_request_line_returns_400_and_closes() {
    let env = TestEnv::start();
    let long_path: String = std::iter::repeat('a').take(5000).collect();
    let response = env.request(&format!("GET /{} HTTP/1.1\r\n\r\n", long_path));
    assert!(
        response.starts_with("HTTP/1.1 400 Bad Request\r\n"),
        "{}",
        response
    );
}

#[test]
fn static_file_served_with_content_type() {
    let env = TestEnv::start();
    let response = env.get("/static/hello.txt");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Type: text/plain; charset=utf-8\r\n"));
    assert_eq!(body_of(&response), "hello from disk");

    let response = env.get("/static/data.json");
    assert!(response.contains("Content-Type: application/json; charset=utf-8\r\n"));
}

#[test]
fn root_serves_index_html() {
    let env = TestEnv::start();
    let response = env.get("/");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Type: text/html; charset=utf-8\r\n"));
    assert_eq!(body_of(&response), "<h1>it works</h1>");
}

#[test]
fn head_reports_get_content_length_with_empty_body() {
    let env = TestEnv::start();
    let get = env.get("/static/hello.txt");
    let head = env.request("HEAD /static/hello.txt HTTP/1.1\r\n\r\n");

    let get_len = body_of(&get).len();
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains(&format!("Content-Length: {}\r\n", get_len)));
    assert_eq!(body_of(&head), "");
}

#[test]
fn every_response_announces_connection_close() {
    let env = TestEnv::start();
    for path in ["/health", "/nope", "/static/hello.txt"] {
        let response = env.get(path);
        assert!(
            response.contains("Connection: close\r\n"),
            "missing Connection header for {}",
            path
        );
    }
}

#[test]
fn traversal_attempt_stays_inside_root() {
    let env = TestEnv::start();
    // secret.txt lives next to (not inside) the static root
    fs::write(env._root.path().parent().unwrap().join("secret.txt"), b"x").ok();

    for path in [
        "/static/../secret.txt",
        "/static/....//secret.txt",
        "/static/..%2fsecret.txt",
    ] {
        let response = env.get(path);
        assert!(
            response.starts_with("HTTP/1.1 404 Not Found\r\n"),
            "expected 404 for {}, got {}",
            path,
            response
        );
    }
}

#[test]
fn udp_ping_lowercase_gets_pong_with_utc_z_timestamp() {
    let env = TestEnv::start();
    let client = UdpSocket::bind("127.0.0.1:0").unwrap();
    client
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    client.send_to(b"ping", env.udp_addr).unwrap();
    let mut buf = [0u8; 256];
    let (len, _) = client.recv_from(&mut buf).unwrap();
    let reply = std::str::from_utf8(&buf[..len]).unwrap();

    assert!(reply.starts_with("PONG "), "{}", reply);
    assert!(reply.ends_with("Z\n"), "{}", reply);
    let ts = &reply[5..reply.len() - 1];
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "{}", ts);
}

#[test]
fn udp_unknown_payload_gets_no_reply() {
    let env = TestEnv::start();
    let client = UdpSocket::bind("127.0.0.1:0").unwrap();
    client
        .set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();

    client.send_to(b"hello", env.udp_addr).unwrap();
    let mut buf = [0u8; 256];
    assert!(client.recv_from(&mut buf).is_err(), "no reply expected");
}

#[test]
fn tcp_and_udp_run_independently() {
    let env = TestEnv::start();
    let udp_client = UdpSocket::bind("127.0.0.1:0").unwrap();
    udp_client
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    let http_response = env.get("/health");
    udp_client.send_to(b"PING", env.udp_addr).unwrap();
    let mut buf = [0u8; 256];
    let (len, _) = udp_client.recv_from(&mut buf).unwrap();

    assert!(http_response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(buf[..len].starts_with(b"PONG "));
}
