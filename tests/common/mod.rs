//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

use repo_relay::config::RelayConfig;
use repo_relay::http::{build_router, AppState};

/// What the mock inspector saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request target, e.g. `/repos/demo/file?path=a.py`.
    pub target: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
}

/// Handle to a running mock inspector.
pub struct MockInspector {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockInspector {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Start a programmable mock inspector on an ephemeral port.
///
/// `f` maps each recorded request to a `(status, body)` answer.
pub async fn start_mock_inspector<F>(f: F) -> MockInspector
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = calls.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        recorded.lock().unwrap().push(request.clone());

                        let (status, body) = f(&request);
                        let response_str = format!(
                            "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockInspector { addr, calls }
}

/// Mock inspector that always answers with the same status and body.
pub async fn start_fixed_inspector(status: u16, body: &'static str) -> MockInspector {
    start_mock_inspector(move |_| (status, body.to_string())).await
}

/// A backend that accepts connections but never answers.
pub async fn start_stalled_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let mut lines = head.split("\r\n");
    let target = lines.next()?.split_whitespace().nth(1)?.to_string();

    let mut authorization = None;
    let mut accept = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "authorization" => authorization = Some(value.trim().to_string()),
                "accept" => accept = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    Some(RecordedRequest {
        target,
        authorization,
        accept,
    })
}

/// Relay config pointing at `base_url`, with a short timeout.
pub fn relay_config(base_url: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.upstream.base_url = base_url.to_string();
    config.upstream.request_timeout_secs = 1;
    config.upstream.connect_timeout_secs = 1;
    config.upstream.use_system_proxy = false;
    config
}

/// Router for a relay pointing at `base_url`.
pub fn relay_app(config: &RelayConfig) -> Router {
    build_router(AppState::from_config(config).unwrap())
}

/// Issue a request through the router and decode the JSON body.
pub async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("{} {} returned non-JSON body ({}): {:?}", method, uri, e, bytes));
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, "GET", uri).await
}

/// Assert the body is exactly one non-empty `error` string.
pub fn assert_error_body(body: &Value) -> &str {
    let obj = body.as_object().expect("error body must be an object");
    assert_eq!(obj.len(), 1, "error body must have exactly one field: {}", body);
    let message = obj
        .get("error")
        .and_then(Value::as_str)
        .expect("error field must be a string");
    assert!(!message.is_empty(), "error message must not be empty");
    message
}
