//! HTTP transport boundary.
//!
//! # Design
//! Requests and responses are plain data. The `ApiClient` builds
//! `HttpRequest` values and interprets `HttpResponse` values; the actual
//! round-trip happens behind the `Transport` trait, so the client logic
//! stays deterministic and testable with a scripted transport. A ureq-based
//! implementation ships with the crate for real use.
//!
//! `TransportError` carries only the two connectivity outcomes the result
//! normalization distinguishes: a timeout and everything-else. HTTP error
//! statuses are not transport errors; they come back as `HttpResponse` data
//! and are classified by the client.

use std::time::Duration;

use thiserror::Error;

/// HTTP method for a request. The backend contract only uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already includes any query string. The body's
/// content type, when present, travels in `headers`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Connectivity failures reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    TimedOut,

    /// The server could not be reached at all.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Executes HTTP requests on behalf of the client.
///
/// Implementations must return 4xx/5xx responses as `Ok(HttpResponse)`;
/// only connectivity failures are `Err`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a ureq agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Build an agent with status-as-error disabled (the client interprets
    /// statuses itself) and a global timeout covering the whole call.
    pub fn new(timeout_ms: u64) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_millis(timeout_ms)))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::TimedOut,
        ureq::Error::Io(ref io) if io.kind() == std::io::ErrorKind::TimedOut => {
            TransportError::TimedOut
        }
        other => TransportError::ConnectionFailed(other.to_string()),
    }
}
