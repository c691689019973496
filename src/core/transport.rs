//! HTTP Transport
//!
//! HTTP client interface used for both the token endpoint and the target
//! request.

use async_trait::async_trait;
use std::borrow::Cow;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AurlError, ConfigurationError, NetworkError, ProtocolError};

/// HTTP request definition.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URL.
    pub url: String,
    /// Request headers, in send order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Option<String>,
    /// Request timeout.
    pub timeout: Option<Duration>,
    /// Largest accepted response body; `None` reads the body whatever its size.
    pub max_response_size: Option<usize>,
}

impl HttpRequest {
    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Check if a header is present (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }
}

/// HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(ConfigurationError::InvalidMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// HTTP response definition.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Status text.
    pub status_text: String,
    /// Response headers, in arrival order.
    pub headers: Vec<(String, String)>,
    /// Response body, exactly as received.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with a body and no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check for a 3xx status.
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Headers grouped by name, for JSON output.
    pub fn header_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in &self.headers {
            map.entry(name.clone()).or_default().push(value.clone());
        }
        map
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// HTTP transport interface (for dependency injection).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AurlError>;
}

/// Transport construction options.
#[derive(Clone, Debug)]
pub struct TransportOptions {
    /// Default request timeout.
    pub timeout: Duration,
    /// Skip TLS certificate verification.
    pub insecure: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            insecure: false,
        }
    }
}

/// Default reqwest-based HTTP transport.
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl ReqwestHttpTransport {
    /// Create new transport with default settings.
    pub fn new() -> Result<Self, AurlError> {
        Self::with_options(TransportOptions::default())
    }

    /// Create transport with custom options.
    pub fn with_options(options: TransportOptions) -> Result<Self, AurlError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            // Redirects are reported to the caller, never followed
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(options.insecure)
            .build()
            .map_err(|e| NetworkError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            default_timeout: options.timeout,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AurlError> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);
        let limit = request.max_response_size;

        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes()).map_err(
            |_| ConfigurationError::InvalidMethod {
                method: request.method.to_string(),
            },
        )?;

        let mut req_builder = self.client.request(method, &request.url);

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        req_builder = req_builder.timeout(timeout);

        let mut response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout { timeout }
            } else {
                NetworkError::ConnectionFailed {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (key.as_str().to_string(), v.to_string()))
            })
            .collect();

        if let (Some(limit), Some(len)) = (limit, response.content_length()) {
            if len > limit as u64 {
                return Err(ProtocolError::ResponseTooLarge { size: len as usize }.into());
            }
        }

        let read_failed = |e: reqwest::Error| ProtocolError::InvalidResponse {
            message: e.to_string(),
        };
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(read_failed)? {
            body.extend_from_slice(&chunk);
            if matches!(limit, Some(limit) if body.len() > limit) {
                return Err(ProtocolError::ResponseTooLarge { size: body.len() }.into());
            }
        }

        Ok(HttpResponse {
            status,
            status_text,
            headers,
            body,
        })
    }
}

/// Mock HTTP transport for testing.
///
/// Queued outcomes are returned in FIFO order.
#[derive(Default)]
pub struct MockHttpTransport {
    outcomes: std::sync::Mutex<VecDeque<Result<HttpResponse, AurlError>>>,
    request_history: std::sync::Mutex<Vec<HttpRequest>>,
}

impl MockHttpTransport {
    /// Create new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        self.outcomes.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue a JSON response.
    pub fn queue_json_response<T: serde::Serialize>(&self, status: u16, body: &T) -> &Self {
        let response = HttpResponse {
            status,
            status_text: if status == 200 { "OK" } else { "Error" }.to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(body).unwrap(),
        };
        self.queue_response(response)
    }

    /// Queue a transport failure.
    pub fn queue_error(&self, error: AurlError) -> &Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    /// Get request history.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        self.request_history.lock().unwrap().clone()
    }

    /// Get last request.
    pub fn get_last_request(&self) -> Option<HttpRequest> {
        self.request_history.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AurlError> {
        self.request_history.lock().unwrap().push(request);

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(NetworkError::ConnectionFailed {
                    message: "No mock response available".to_string(),
                }
                .into())
            })
    }
}

/// Create production HTTP transport.
pub fn create_transport(options: TransportOptions) -> Result<ReqwestHttpTransport, AurlError> {
    ReqwestHttpTransport::with_options(options)
}
