//! Profile Types
//!
//! OAuth2 client and provider description resolved from the profile file.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Name of the profile used when none is given.
pub const DEFAULT_PROFILE: &str = "default";

/// Named OAuth2 client/provider configuration.
#[derive(Clone)]
pub struct Profile {
    /// Profile name, also the token file key.
    pub name: String,
    /// Authorization endpoint URL.
    pub authorization_endpoint: String,
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// Redirect URI registered for the authorization code grant.
    pub redirect_uri: Option<String>,
    /// Client identifier.
    pub client_id: String,
    /// Client secret (for confidential clients).
    pub client_secret: Option<SecretString>,
    /// Client authentication method.
    pub auth_method: ClientAuthMethod,
    /// Grant used when a new token must be acquired.
    pub grant_type: GrantType,
    /// Scopes to request.
    pub scopes: Vec<String>,
    /// Resource owner username (password grant).
    pub username: Option<String>,
    /// Resource owner password (password grant).
    pub password: Option<SecretString>,
    /// Content-Type sent with a request body when none is given.
    pub default_content_type: Option<String>,
    /// User-Agent sent when none is given.
    pub default_user_agent: Option<String>,
}

impl Profile {
    /// Scopes joined for the `scope` form parameter.
    pub fn scope_param(&self) -> Option<String> {
        if self.scopes.is_empty() {
            None
        } else {
            Some(self.scopes.join(" "))
        }
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("redirect_uri", &self.redirect_uri)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("auth_method", &self.auth_method)
            .field("grant_type", &self.grant_type)
            .field("scopes", &self.scopes)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("default_content_type", &self.default_content_type)
            .field("default_user_agent", &self.default_user_agent)
            .finish()
    }
}

/// Client authentication method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// client_id and client_secret in request body.
    ClientSecretPost,
    /// HTTP Basic Authentication header.
    #[default]
    ClientSecretBasic,
}

impl FromStr for ClientAuthMethod {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client_secret_basic" | "basic" => Ok(Self::ClientSecretBasic),
            "client_secret_post" | "post" => Ok(Self::ClientSecretPost),
            other => Err(ConfigurationError::InvalidConfig {
                message: format!("unknown client_auth_method '{}'", other),
            }),
        }
    }
}

/// Grant type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantType {
    #[serde(rename = "authorization_code")]
    AuthorizationCode,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "client_credentials")]
    ClientCredentials,
    #[serde(rename = "refresh_token")]
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::Password => "password",
            Self::ClientCredentials => "client_credentials",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantType {
    type Err = ConfigurationError;

    /// Parse a grant usable for acquisition. `refresh_token` is not accepted
    /// since it cannot start a session.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "authorization_code" => Ok(Self::AuthorizationCode),
            "password" => Ok(Self::Password),
            "client_credentials" => Ok(Self::ClientCredentials),
            other => Err(ConfigurationError::UnsupportedGrantType {
                grant_type: other.to_string(),
            }),
        }
    }
}
