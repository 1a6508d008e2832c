//! HTTP transport used by the health prober.
//!
//! # Responsibilities
//! - Issue one request per probe with a deadline
//! - Support byte-range requests for gateway probes
//! - Report status and headers without judging them

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RANGE, USER_AGENT};
use std::time::Duration;
use thiserror::Error;

/// HTTP method used for a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMethod {
    #[default]
    Get,
    Head,
}

/// Per-request options.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub method: ProbeMethod,
    pub timeout: Duration,
    /// Inclusive byte range, sent as `Range: bytes=start-end`.
    pub range: Option<(u64, u64)>,
    pub user_agent: Option<String>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            method: ProbeMethod::Get,
            timeout: Duration::from_secs(5),
            range: None,
            user_agent: None,
        }
    }
}

/// Raw outcome of a request that reached the server.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub ok: bool,
    pub status: u16,
    pub headers: HeaderMap,
}

impl ProbeResponse {
    pub fn from_status(status: u16) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            headers: HeaderMap::new(),
        }
    }
}

/// Transport-level failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Network(String),
}

/// Capability to send a single probe request.
#[async_trait]
pub trait HttpProbe: Send + Sync + std::fmt::Debug {
    async fn probe(&self, url: &str, options: &ProbeOptions) -> Result<ProbeResponse, TransportError>;
}

/// `HttpProbe` backed by a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestProbe {
    client: reqwest::Client,
}

impl ReqwestProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn probe(&self, url: &str, options: &ProbeOptions) -> Result<ProbeResponse, TransportError> {
        let mut request = match options.method {
            ProbeMethod::Get => self.client.get(url),
            ProbeMethod::Head => self.client.head(url),
        }
        .timeout(options.timeout);

        if let Some((start, end)) = options.range {
            request = request.header(RANGE, format!("bytes={}-{}", start, end));
        }
        if let Some(agent) = &options.user_agent {
            request = request.header(USER_AGENT, agent.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        Ok(ProbeResponse {
            ok: status.is_success(),
            status: status.as_u16(),
            headers: response.headers().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_from_status() {
        assert!(ProbeResponse::from_status(200).ok);
        assert!(ProbeResponse::from_status(206).ok);
        assert!(!ProbeResponse::from_status(302).ok);
        assert!(!ProbeResponse::from_status(503).ok);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let probe = ReqwestProbe::with_client(reqwest::Client::builder().no_proxy().build().unwrap());
        let options = ProbeOptions {
            timeout: Duration::from_secs(2),
            ..ProbeOptions::default()
        };
        // Port 9 (discard) is closed on loopback in practice.
        let result = probe.probe("http://127.0.0.1:9/", &options).await;
        assert!(result.is_err());
    }
}
