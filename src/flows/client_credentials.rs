//! Client Credentials Flow
//!
//! RFC 6749 Section 4.4 - Client Credentials Grant.

use secrecy::SecretString;

use crate::core::HttpTransport;
use crate::error::AurlError;
use crate::flows::TokenEndpoint;
use crate::types::{GrantType, Profile, TokenRecord};

/// Client Credentials Flow.
pub struct ClientCredentialsFlow<T: HttpTransport> {
    endpoint: TokenEndpoint<T>,
}

impl<T: HttpTransport> ClientCredentialsFlow<T> {
    /// Create new Client Credentials Flow.
    pub fn new(endpoint: TokenEndpoint<T>) -> Self {
        Self { endpoint }
    }

    /// Request access token using client credentials.
    pub async fn request_token(
        &self,
        profile: &Profile,
        client_secret: Option<&SecretString>,
    ) -> Result<TokenRecord, AurlError> {
        let params = vec![(
            "grant_type",
            GrantType::ClientCredentials.as_str().to_string(),
        )];
        self.endpoint
            .request_token(profile, params, client_secret)
            .await
    }
}
