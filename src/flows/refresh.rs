//! Refresh Token Flow
//!
//! RFC 6749 Section 6 - Refreshing an Access Token.

use secrecy::SecretString;

use crate::core::HttpTransport;
use crate::error::AurlError;
use crate::flows::TokenEndpoint;
use crate::types::{GrantType, Profile, TokenRecord};

/// Refresh Token Flow.
pub struct RefreshFlow<T: HttpTransport> {
    endpoint: TokenEndpoint<T>,
}

impl<T: HttpTransport> RefreshFlow<T> {
    /// Create new Refresh Flow.
    pub fn new(endpoint: TokenEndpoint<T>) -> Self {
        Self { endpoint }
    }

    /// Exchange a refresh token for a new token.
    pub async fn refresh(
        &self,
        profile: &Profile,
        refresh_token: &str,
        client_secret: Option<&SecretString>,
    ) -> Result<TokenRecord, AurlError> {
        let params = vec![
            ("grant_type", GrantType::RefreshToken.as_str().to_string()),
            ("refresh_token", refresh_token.to_string()),
        ];
        self.endpoint
            .request_token(profile, params, client_secret)
            .await
    }
}
