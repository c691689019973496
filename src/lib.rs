//! aurl
//!
//! Command line HTTP client that negotiates OAuth2 credentials before sending
//! a request.
//!
//! # Features
//!
//! - Named profiles read from `~/.aurl/profiles`
//! - Authorization Code Grant, out-of-band (RFC 6749 Section 4.1)
//! - Resource Owner Password Credentials Grant (RFC 6749 Section 4.3)
//! - Client Credentials Grant (RFC 6749 Section 4.4)
//! - Token Refresh (RFC 6749 Section 6)
//! - Per-profile token cache under `~/.aurl/token/`
//!
//! # Example
//!
//! ```rust,ignore
//! use aurl::{AurlExecution, ExecutionConfig, GrantType, ProfileBuilder};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), aurl::AurlError> {
//!     let profile = ProfileBuilder::new()
//!         .name("service")
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .token_endpoint("https://provider.com/token")
//!         .grant_type(GrantType::ClientCredentials)
//!         .add_scope("read")
//!         .build()?;
//!
//!     let config = ExecutionConfig {
//!         profile_name: "service".to_string(),
//!         target_url: "https://api.provider.com/items".to_string(),
//!         ..Default::default()
//!     };
//!
//!     let execution = AurlExecution::new(config, profile)?;
//!     execution.execute(&mut std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: profile, token record and execution configuration
//! - `error`: error hierarchy with provider error mapping
//! - `core`: HTTP transport
//! - `flows`: grant requests against the token endpoint
//! - `prompt`: interactive credential input
//! - `token`: token store and token lifecycle manager
//! - `profile`: profile file reader
//! - `builders`: fluent profile builder
//! - `telemetry`: diagnostic logging
//! - `execution`: the authenticated request
//! - `cli`: command line flags

pub mod builders;
pub mod cli;
pub mod core;
pub mod error;
pub mod execution;
pub mod flows;
pub mod profile;
pub mod prompt;
pub mod telemetry;
pub mod token;
pub mod types;

// Re-export execution
pub use execution::{parse_header, write_response, AurlExecution, DEFAULT_USER_AGENT};

// Re-export builders
pub use builders::{ProfileBuilder, OOB_REDIRECT_URI};

// Re-export errors
pub use error::{
    create_error_from_response, map_token_error, parse_error_response, AurlError, AurlResult,
    ConfigurationError, NetworkError, OAuth2ErrorResponse, PromptError, ProtocolError,
    ProviderError, StorageError, TokenError,
};

// Re-export types
pub use types::{
    // Config
    ExecutionConfig, DEFAULT_TIMEOUT_SECS,
    // Profile
    ClientAuthMethod, GrantType, Profile, DEFAULT_PROFILE,
    // Token
    AccessToken, MissingExpiry, TokenRecord,
};

// Re-export core components
pub use crate::core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport, TransportOptions,
};

// Re-export flows
pub use flows::{
    AuthorizationCodeFlow, ClientCredentialsFlow, FlowCredentials, MockTokenFlows, OAuth2Flows,
    PasswordFlow, RefreshFlow, TokenEndpoint, TokenFlows, MAX_TOKEN_RESPONSE_SIZE,
};

// Re-export prompting
pub use prompt::{CredentialPrompter, PromptRequest, ScriptedPrompter, TerminalPrompter};

// Re-export token management
pub use token::{
    // Store
    FileTokenStore, InMemoryTokenStore, MockTokenStore, TokenStore,
    // Manager
    DefaultTokenManager, MockTokenManager, TokenManager, TokenManagerConfig,
};

// Re-export profiles
pub use profile::{FileProfileStore, InMemoryProfileStore, ProfileStore};

// Re-export telemetry
pub use telemetry::{InMemoryLogger, LogContext, LogEntry, LogLevel, Logger, TracingLogger};
