//! Resource Owner Password Flow
//!
//! RFC 6749 Section 4.3 - Resource Owner Password Credentials Grant.

use secrecy::{ExposeSecret, SecretString};

use crate::core::HttpTransport;
use crate::error::AurlError;
use crate::flows::TokenEndpoint;
use crate::types::{GrantType, Profile, TokenRecord};

/// Resource Owner Password Flow.
pub struct PasswordFlow<T: HttpTransport> {
    endpoint: TokenEndpoint<T>,
}

impl<T: HttpTransport> PasswordFlow<T> {
    /// Create new Password Flow.
    pub fn new(endpoint: TokenEndpoint<T>) -> Self {
        Self { endpoint }
    }

    /// Request access token with resource owner credentials.
    pub async fn request_token(
        &self,
        profile: &Profile,
        username: &str,
        password: &SecretString,
        client_secret: Option<&SecretString>,
    ) -> Result<TokenRecord, AurlError> {
        let params = vec![
            ("grant_type", GrantType::Password.as_str().to_string()),
            ("username", username.to_string()),
            ("password", password.expose_secret().to_string()),
        ];
        self.endpoint
            .request_token(profile, params, client_secret)
            .await
    }
}
