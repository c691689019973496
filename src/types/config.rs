//! Configuration Types
//!
//! Immutable per-invocation configuration assembled from command line flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::core::HttpMethod;
use crate::types::{MissingExpiry, DEFAULT_PROFILE};

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Execution configuration.
///
/// Built once at startup and passed by reference; nothing below the CLI
/// layer reads flags from anywhere else.
#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    /// Profile to resolve.
    pub profile_name: String,
    /// HTTP method of the target request.
    pub method: HttpMethod,
    /// Raw `NAME:VALUE` headers.
    pub headers: Vec<String>,
    /// Request body.
    pub data: Option<String>,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Print response body to stdout.
    pub print_body: bool,
    /// Print response headers JSON to stdout.
    pub print_headers: bool,
    /// Prompt for the client secret when the profile has none.
    pub prompt_client_secret: bool,
    /// Prompt for the password when the profile has none.
    pub prompt_password: bool,
    /// Diagnostic logging to stderr.
    pub verbose: bool,
    /// Target URL.
    pub target_url: String,
    /// Timeout for every HTTP call.
    pub timeout: Duration,
    /// Treat tokens expiring within this window as expired.
    pub refresh_leeway: Duration,
    /// Policy for tokens without a lifetime.
    pub missing_expiry: MissingExpiry,
    /// Profile file override.
    pub profiles_path: Option<PathBuf>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            profile_name: DEFAULT_PROFILE.to_string(),
            method: HttpMethod::Get,
            headers: Vec::new(),
            data: None,
            insecure: false,
            print_body: true,
            print_headers: false,
            prompt_client_secret: false,
            prompt_password: false,
            verbose: false,
            target_url: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            refresh_leeway: Duration::ZERO,
            missing_expiry: MissingExpiry::NeverExpires,
            profiles_path: None,
        }
    }
}
