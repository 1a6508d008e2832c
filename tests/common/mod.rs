//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use node_pulse::http::{HttpProbe, ProbeOptions, ProbeResponse, TransportError};

/// Start a programmable mock backend on an ephemeral port.
///
/// The handler receives the raw request head and returns `(status, body)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();

                        let (status, body) = f(head).await;
                        let reason = match status {
                            200 => "OK",
                            206 => "Partial Content",
                            404 => "Not Found",
                            500 => "Internal Server Error",
                            502 => "Bad Gateway",
                            503 => "Service Unavailable",
                            _ => "Unknown",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
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

    addr
}

/// Mock backend that always answers with a fixed status.
pub async fn start_mock_backend(status: u16) -> SocketAddr {
    start_programmable_backend(move |_| async move { (status, "ok".to_string()) }).await
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Scripted `HttpProbe`: hosts are up or down by name, every call is counted.
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    up: Mutex<HashMap<String, bool>>,
    calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mark exactly these hosts healthy; every other host fails.
    pub fn set_up(&self, hosts: &[&str]) {
        let mut up = self.up.lock().unwrap();
        up.clear();
        for h in hosts {
            up.insert(h.to_string(), true);
        }
    }

    /// Make every probe take this long.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpProbe for ScriptedProbe {
    async fn probe(&self, url: &str, _options: &ProbeOptions) -> Result<ProbeResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let healthy = self
            .up
            .lock()
            .unwrap()
            .keys()
            .any(|host| url.starts_with(&format!("{}/", host)));
        if healthy {
            Ok(ProbeResponse::from_status(200))
        } else {
            Err(TransportError::Network("connection refused".into()))
        }
    }
}

/// Counts notifications per class.
#[derive(Debug, Default)]
pub struct Recorder {
    pub updates: Mutex<Vec<Vec<String>>>,
    pub errors: Mutex<Vec<String>>,
    pub fallbacks: Mutex<Vec<(String, Vec<String>)>>,
}

impl Recorder {
    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }

    pub fn fallback_count(&self) -> usize {
        self.fallbacks.lock().unwrap().len()
    }
}
