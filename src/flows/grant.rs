//! Grant Dispatch
//!
//! Runs the grant configured on a profile and the refresh grant on behalf of
//! the token manager.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::HttpTransport;
use crate::error::{AurlError, ConfigurationError};
use crate::flows::{
    generate_state, AuthorizationCodeFlow, ClientCredentialsFlow, FlowCredentials, PasswordFlow,
    RefreshFlow, TokenEndpoint,
};
use crate::types::{GrantType, Profile, TokenRecord};

/// Token acquisition interface.
#[async_trait]
pub trait TokenFlows: Send + Sync {
    /// Obtain a new token with the profile's grant type.
    async fn acquire(&self, profile: &Profile) -> Result<TokenRecord, AurlError>;

    /// Exchange a refresh token for a new token.
    async fn refresh(&self, profile: &Profile, refresh_token: &str)
        -> Result<TokenRecord, AurlError>;
}

/// OAuth2 grant flows against the profile's token endpoint.
pub struct OAuth2Flows<T: HttpTransport> {
    authorization_code: AuthorizationCodeFlow<T>,
    client_credentials: ClientCredentialsFlow<T>,
    password: PasswordFlow<T>,
    refresh: RefreshFlow<T>,
    credentials: FlowCredentials,
}

impl<T: HttpTransport> OAuth2Flows<T> {
    /// Create grant flows sharing one token endpoint client.
    pub fn new(endpoint: TokenEndpoint<T>, credentials: FlowCredentials) -> Self {
        Self {
            authorization_code: AuthorizationCodeFlow::new(endpoint.clone()),
            client_credentials: ClientCredentialsFlow::new(endpoint.clone()),
            password: PasswordFlow::new(endpoint.clone()),
            refresh: RefreshFlow::new(endpoint),
            credentials,
        }
    }
}

#[async_trait]
impl<T: HttpTransport> TokenFlows for OAuth2Flows<T> {
    async fn acquire(&self, profile: &Profile) -> Result<TokenRecord, AurlError> {
        match profile.grant_type {
            GrantType::AuthorizationCode => {
                let url = self
                    .authorization_code
                    .build_authorization_url(profile, &generate_state())?;
                let code = self.credentials.authorization_code(&url)?;
                let secret = self.credentials.client_secret(profile)?;
                self.authorization_code
                    .exchange_code(profile, &code, secret.as_ref())
                    .await
            }
            GrantType::Password => {
                let username = profile.username.as_deref().unwrap_or_default();
                if username.is_empty() {
                    return Err(ConfigurationError::MissingRequired {
                        field: "username".to_string(),
                    }
                    .into());
                }
                let password = self.credentials.password(profile, username)?;
                let secret = self.credentials.client_secret(profile)?;
                self.password
                    .request_token(profile, username, &password, secret.as_ref())
                    .await
            }
            GrantType::ClientCredentials => {
                let secret = self.credentials.client_secret(profile)?;
                self.client_credentials
                    .request_token(profile, secret.as_ref())
                    .await
            }
            GrantType::RefreshToken => Err(ConfigurationError::UnsupportedGrantType {
                grant_type: GrantType::RefreshToken.to_string(),
            }
            .into()),
        }
    }

    async fn refresh(
        &self,
        profile: &Profile,
        refresh_token: &str,
    ) -> Result<TokenRecord, AurlError> {
        let secret = self.credentials.client_secret(profile)?;
        self.refresh
            .refresh(profile, refresh_token, secret.as_ref())
            .await
    }
}

/// Mock token flows for testing.
#[derive(Default)]
pub struct MockTokenFlows {
    acquire_results: Mutex<VecDeque<Result<TokenRecord, AurlError>>>,
    refresh_results: Mutex<VecDeque<Result<TokenRecord, AurlError>>>,
    acquire_history: Mutex<Vec<String>>,
    refresh_history: Mutex<Vec<(String, String)>>,
}

impl MockTokenFlows {
    /// Create new mock flows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an acquire outcome.
    pub fn queue_acquire(&self, result: Result<TokenRecord, AurlError>) -> &Self {
        self.acquire_results.lock().unwrap().push_back(result);
        self
    }

    /// Queue a refresh outcome.
    pub fn queue_refresh(&self, result: Result<TokenRecord, AurlError>) -> &Self {
        self.refresh_results.lock().unwrap().push_back(result);
        self
    }

    /// Profiles acquired for, in call order.
    pub fn get_acquire_history(&self) -> Vec<String> {
        self.acquire_history.lock().unwrap().clone()
    }

    /// `(profile, refresh_token)` pairs refreshed, in call order.
    pub fn get_refresh_history(&self) -> Vec<(String, String)> {
        self.refresh_history.lock().unwrap().clone()
    }

    fn next(
        queue: &Mutex<VecDeque<Result<TokenRecord, AurlError>>>,
    ) -> Result<TokenRecord, AurlError> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ConfigurationError::InvalidConfig {
                message: "no mock outcome queued".to_string(),
            }
            .into())
        })
    }
}

#[async_trait]
impl TokenFlows for MockTokenFlows {
    async fn acquire(&self, profile: &Profile) -> Result<TokenRecord, AurlError> {
        self.acquire_history
            .lock()
            .unwrap()
            .push(profile.name.clone());
        Self::next(&self.acquire_results)
    }

    async fn refresh(
        &self,
        profile: &Profile,
        refresh_token: &str,
    ) -> Result<TokenRecord, AurlError> {
        self.refresh_history
            .lock()
            .unwrap()
            .push((profile.name.clone(), refresh_token.to_string()));
        Self::next(&self.refresh_results)
    }
}
