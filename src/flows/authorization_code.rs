//! Authorization Code Flow
//!
//! RFC 6749 Section 4.1 - Authorization Code Grant, out-of-band variant: the
//! user opens the authorization URL and pastes the code back.

use rand::Rng;
use secrecy::SecretString;
use url::Url;

use crate::builders::OOB_REDIRECT_URI;
use crate::core::HttpTransport;
use crate::error::{AurlError, ConfigurationError};
use crate::flows::TokenEndpoint;
use crate::types::{GrantType, Profile, TokenRecord};

/// Authorization Code Flow.
pub struct AuthorizationCodeFlow<T: HttpTransport> {
    endpoint: TokenEndpoint<T>,
}

impl<T: HttpTransport> AuthorizationCodeFlow<T> {
    /// Create new Authorization Code Flow.
    pub fn new(endpoint: TokenEndpoint<T>) -> Self {
        Self { endpoint }
    }

    /// Build the authorization URL the user must visit.
    pub fn build_authorization_url(
        &self,
        profile: &Profile,
        state: &str,
    ) -> Result<String, AurlError> {
        let mut url = Url::parse(&profile.authorization_endpoint).map_err(|_| {
            ConfigurationError::InvalidEndpoint {
                url: profile.authorization_endpoint.clone(),
            }
        })?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &profile.client_id)
                .append_pair("redirect_uri", redirect_uri(profile));
            if let Some(scope) = profile.scope_param() {
                query.append_pair("scope", &scope);
            }
            query.append_pair("state", state);
        }

        Ok(url.to_string())
    }

    /// Exchange authorization code for tokens.
    pub async fn exchange_code(
        &self,
        profile: &Profile,
        code: &str,
        client_secret: Option<&SecretString>,
    ) -> Result<TokenRecord, AurlError> {
        let params = vec![
            ("grant_type", GrantType::AuthorizationCode.as_str().to_string()),
            ("code", code.to_string()),
            ("redirect_uri", redirect_uri(profile).to_string()),
        ];
        self.endpoint
            .request_token(profile, params, client_secret)
            .await
    }
}

fn redirect_uri(profile: &Profile) -> &str {
    profile
        .redirect_uri
        .as_deref()
        .filter(|uri| !uri.is_empty())
        .unwrap_or(OOB_REDIRECT_URI)
}

/// Generate a random `state` value.
pub fn generate_state() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::ProfileBuilder;
    use crate::core::MockHttpTransport;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn code_profile() -> Profile {
        ProfileBuilder::new()
            .client_id("web-client")
            .authorization_endpoint("https://auth.example.com/authorize")
            .token_endpoint("https://auth.example.com/token")
            .add_scope("openid")
            .add_scope("email")
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_authorization_url() {
        let flow = AuthorizationCodeFlow::new(TokenEndpoint::new(Arc::new(
            MockHttpTransport::new(),
        )));

        let url = flow
            .build_authorization_url(&code_profile(), "xyz")
            .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let params: HashMap<_, _> = parsed.query_pairs().into_owned().collect();

        assert_eq!(parsed.path(), "/authorize");
        assert_eq!(params.get("response_type").unwrap(), "code");
        assert_eq!(params.get("client_id").unwrap(), "web-client");
        assert_eq!(params.get("redirect_uri").unwrap(), OOB_REDIRECT_URI);
        assert_eq!(params.get("scope").unwrap(), "openid email");
        assert_eq!(params.get("state").unwrap(), "xyz");
    }

    #[test]
    fn test_generate_state_is_random() {
        let a = generate_state();
        let b = generate_state();
        assert_ne!(a, b);
        assert_eq!(a.len(), 22);
    }

    #[tokio::test]
    async fn test_exchange_code_uses_profile_redirect() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &serde_json::json!({ "access_token": "ac" }));

        let mut profile = code_profile();
        profile.redirect_uri = Some("http://localhost:8080/cb".to_string());

        let flow = AuthorizationCodeFlow::new(TokenEndpoint::new(transport.clone()));
        let record = flow.exchange_code(&profile, "the-code", None).await.unwrap();
        assert_eq!(record.access_token, "ac");

        let body = transport.get_last_request().unwrap().body.unwrap();
        assert!(body.starts_with(
            "grant_type=authorization_code&code=the-code&redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcb"
        ));
    }
}
