//! Error Types
//!
//! Error hierarchy for profile resolution, token negotiation and request
//! execution.

use std::time::Duration;
use thiserror::Error;

use crate::types::GrantType;

/// Root error type for aurl.
#[derive(Error, Debug)]
pub enum AurlError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl AurlError {
    /// Get error code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "AURL_CONFIG",
            Self::Token(_) => "AURL_TOKEN",
            Self::Network(_) => "AURL_NETWORK",
            Self::Storage(_) => "AURL_STORAGE",
            Self::Protocol(_) => "AURL_PROTOCOL",
            Self::Provider(_) => "AURL_PROVIDER",
            Self::Prompt(_) => "AURL_PROMPT",
            Self::Output(_) => "AURL_OUTPUT",
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("Profile '{name}' not found in {path}")]
    ProfileNotFound { name: String, path: String },

    #[error("Failed to read profiles from {path}: {message}")]
    ProfileFileUnreadable { path: String, message: String },

    #[error("Unsupported grant type: {grant_type}")]
    UnsupportedGrantType { grant_type: String },

    #[error("Invalid header '{header}', expected NAME:VALUE")]
    InvalidHeader { header: String },

    #[error("Invalid HTTP method: {method}")]
    InvalidMethod { method: String },
}

/// Token lifecycle error.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("No cached token for profile '{profile}'")]
    NotFound { profile: String },

    #[error("Failed to parse token response: {message}")]
    Parse { message: String },

    #[error("Token refresh failed: {message}")]
    RefreshFailed { message: String },

    #[error("Failed to acquire token with {grant_type} grant: {source}")]
    AcquireFailed {
        grant_type: GrantType,
        #[source]
        source: Box<AurlError>,
    },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

/// Protocol/response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Unexpected redirect to: {location}")]
    UnexpectedRedirect { location: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// Token file storage error.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Write failed for {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Cannot create directory {path}: {message}")]
    CreateDirFailed { path: String, message: String },

    #[error("Home directory could not be determined")]
    NoHomeDirectory,

    #[error("Profile name '{profile}' cannot be used as a token file name")]
    InvalidProfileName { profile: String },
}

/// Provider (OAuth2 server) error.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid client credentials")]
    InvalidClient { error_description: Option<String> },

    #[error("Invalid grant: {message}")]
    InvalidGrant { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Invalid scope: {scope}")]
    InvalidScope { scope: String },

    #[error("Unauthorized client for this grant type")]
    UnauthorizedClient { error_description: Option<String> },

    #[error("Unsupported grant type: {grant_type}")]
    UnsupportedGrantType { grant_type: String },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("Server temporarily unavailable")]
    TemporarilyUnavailable { retry_after: Option<Duration> },
}

/// Interactive prompt error.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Prompt for {what} was cancelled")]
    Cancelled { what: String },

    #[error("Empty {what} entered")]
    Empty { what: String },

    #[error("Prompt I/O failed: {message}")]
    Io { message: String },
}

/// Result type for aurl operations.
pub type AurlResult<T> = Result<T, AurlError>;

/// OAuth2 error response from provider (RFC 6749 Section 5.2).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OAuth2ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_uri: Option<String>,
}

/// Map token error response to error type.
pub fn map_token_error(response: &OAuth2ErrorResponse) -> ProviderError {
    match response.error.as_str() {
        "invalid_client" => ProviderError::InvalidClient {
            error_description: response.error_description.clone(),
        },
        "invalid_grant" => ProviderError::InvalidGrant {
            message: response
                .error_description
                .clone()
                .unwrap_or_else(|| "Invalid grant".to_string()),
        },
        "invalid_request" => ProviderError::InvalidRequest {
            message: response
                .error_description
                .clone()
                .unwrap_or_else(|| "Invalid request".to_string()),
        },
        "invalid_scope" => ProviderError::InvalidScope {
            scope: response.error_description.clone().unwrap_or_default(),
        },
        "unauthorized_client" => ProviderError::UnauthorizedClient {
            error_description: response.error_description.clone(),
        },
        "unsupported_grant_type" => ProviderError::UnsupportedGrantType {
            grant_type: response.error_description.clone().unwrap_or_default(),
        },
        "server_error" => ProviderError::ServerError {
            message: response
                .error_description
                .clone()
                .unwrap_or_else(|| "Server error".to_string()),
        },
        "temporarily_unavailable" => ProviderError::TemporarilyUnavailable { retry_after: None },
        _ => ProviderError::InvalidRequest {
            message: response
                .error_description
                .clone()
                .unwrap_or_else(|| response.error.clone()),
        },
    }
}

/// Parse error response from HTTP body.
pub fn parse_error_response(body: &str) -> Option<OAuth2ErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Create error from a non-success token endpoint response.
pub fn create_error_from_response(status: u16, body: &str) -> AurlError {
    if let Some(response) = parse_error_response(body) {
        return AurlError::Provider(map_token_error(&response));
    }

    let error = match status {
        400 => ProviderError::InvalidRequest {
            message: "Bad request".to_string(),
        },
        401 => ProviderError::InvalidClient {
            error_description: Some("Unauthorized".to_string()),
        },
        403 => ProviderError::UnauthorizedClient {
            error_description: Some("Forbidden".to_string()),
        },
        429 => ProviderError::TemporarilyUnavailable {
            retry_after: Some(Duration::from_secs(60)),
        },
        _ => ProviderError::ServerError {
            message: format!("HTTP {}", status),
        },
    };

    AurlError::Provider(error)
}
