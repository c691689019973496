//! Token Endpoint
//!
//! Form-encoded POST to the provider token endpoint shared by every grant.

use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{create_error_from_response, AurlError, ProtocolError};
use crate::types::{ClientAuthMethod, Profile, TokenRecord};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Largest token endpoint response accepted.
pub const MAX_TOKEN_RESPONSE_SIZE: usize = 1024 * 1024;

/// Token endpoint client.
pub struct TokenEndpoint<T: HttpTransport> {
    transport: Arc<T>,
    timeout: Option<Duration>,
}

impl<T: HttpTransport> Clone for TokenEndpoint<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            timeout: self.timeout,
        }
    }
}

impl<T: HttpTransport> TokenEndpoint<T> {
    /// Create new token endpoint client.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    /// Set per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// POST grant parameters and parse the token response.
    ///
    /// `scope` is appended from the profile when it has scopes.
    pub async fn request_token(
        &self,
        profile: &Profile,
        mut params: Vec<(&'static str, String)>,
        client_secret: Option<&SecretString>,
    ) -> Result<TokenRecord, AurlError> {
        if let Some(scope) = profile.scope_param() {
            params.push(("scope", scope));
        }

        let mut headers = vec![
            ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];

        match (profile.auth_method, client_secret) {
            (ClientAuthMethod::ClientSecretBasic, Some(secret)) => {
                headers.push((
                    "Authorization".to_string(),
                    basic_authorization(&profile.client_id, secret),
                ));
            }
            (ClientAuthMethod::ClientSecretPost, Some(secret)) => {
                params.push(("client_id", profile.client_id.clone()));
                params.push(("client_secret", secret.expose_secret().to_string()));
            }
            (_, None) => {
                params.push(("client_id", profile.client_id.clone()));
            }
        }

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: profile.token_endpoint.clone(),
            headers,
            body: Some(encode_form(&params)),
            timeout: self.timeout,
            max_response_size: Some(MAX_TOKEN_RESPONSE_SIZE),
        };

        let response = self.transport.send(request).await?;

        if response.is_redirect() {
            return Err(ProtocolError::UnexpectedRedirect {
                location: response.header("location").unwrap_or_default().to_string(),
            }
            .into());
        }

        let body = response.body_text();
        if !response.is_success() {
            return Err(create_error_from_response(response.status, &body));
        }

        TokenRecord::parse(Some(&*body))
    }
}

/// `Basic` header value for client authentication.
pub fn basic_authorization(client_id: &str, secret: &SecretString) -> String {
    let credentials = format!("{}:{}", client_id, secret.expose_secret());
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(credentials)
    )
}

/// Encode `application/x-www-form-urlencoded` parameters.
pub fn encode_form(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
