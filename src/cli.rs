//! Command Line
//!
//! Flag parsing into an [`ExecutionConfig`].

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::core::HttpMethod;
use crate::error::{AurlError, ConfigurationError};
use crate::types::{ExecutionConfig, MissingExpiry, DEFAULT_PROFILE, DEFAULT_TIMEOUT_SECS};

/// Command line HTTP client with OAuth2 token negotiation.
#[derive(Parser, Debug)]
#[command(name = "aurl", version, about)]
pub struct Cli {
    /// Profile name.
    #[arg(short = 'p', long, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// HTTP method.
    #[arg(short = 'X', long = "request", default_value = "GET")]
    pub request: String,

    /// Request header as `Name: Value`, repeatable.
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body.
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// Skip TLS certificate verification.
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Print the response body (default).
    #[arg(long, overrides_with = "no_print_body")]
    pub print_body: bool,

    /// Do not print the response body.
    #[arg(long, overrides_with = "print_body")]
    pub no_print_body: bool,

    /// Print the response headers as JSON.
    #[arg(long)]
    pub print_headers: bool,

    /// Prompt for the client secret when the profile has none.
    #[arg(long)]
    pub prompt_client_secret: bool,

    /// Prompt for the password when the profile has none.
    #[arg(long)]
    pub prompt_password: bool,

    /// Diagnostic logging to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Timeout for each HTTP call, in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Refresh tokens expiring within this many seconds.
    #[arg(long, default_value_t = 0)]
    pub refresh_leeway: u64,

    /// Treat tokens issued without a lifetime as expired.
    #[arg(long)]
    pub expire_without_lifetime: bool,

    /// Profile file.
    #[arg(long, env = "AURL_PROFILES")]
    pub profiles: Option<PathBuf>,

    /// Target URL.
    pub url: String,
}

impl Cli {
    /// Validate flags into the execution configuration.
    pub fn into_config(self) -> Result<ExecutionConfig, AurlError> {
        let method: HttpMethod = self.request.parse()?;

        match Url::parse(&self.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigurationError::InvalidEndpoint { url: self.url }.into());
            }
        }

        if self.timeout == 0 {
            return Err(ConfigurationError::InvalidConfig {
                message: "timeout must be positive".to_string(),
            }
            .into());
        }

        Ok(ExecutionConfig {
            profile_name: self.profile,
            method,
            headers: self.headers,
            data: self.data,
            insecure: self.insecure,
            print_body: !self.no_print_body,
            print_headers: self.print_headers,
            prompt_client_secret: self.prompt_client_secret,
            prompt_password: self.prompt_password,
            verbose: self.verbose,
            target_url: self.url,
            timeout: Duration::from_secs(self.timeout),
            refresh_leeway: Duration::from_secs(self.refresh_leeway),
            missing_expiry: if self.expire_without_lifetime {
                MissingExpiry::TreatAsExpired
            } else {
                MissingExpiry::NeverExpires
            },
            profiles_path: self.profiles,
        })
    }
}
