//! Token Manager
//!
//! Decides whether a cached token is usable, refreshes it when expired and
//! falls back to a new grant when no usable token exists.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AurlError, TokenError};
use crate::flows::TokenFlows;
use crate::telemetry::{LogContext, Logger};
use crate::token::TokenStore;
use crate::types::{AccessToken, MissingExpiry, Profile, TokenRecord};

/// Token manager interface.
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Get a usable access token for the profile.
    async fn get_access_token(&self, profile: &Profile) -> Result<AccessToken, AurlError>;
}

/// Token manager configuration.
#[derive(Debug, Clone, Default)]
pub struct TokenManagerConfig {
    /// Tokens expiring within this window are treated as expired.
    pub refresh_leeway: Duration,
    /// Policy for tokens without a lifetime.
    pub missing_expiry: MissingExpiry,
}

/// Default token manager implementation.
pub struct DefaultTokenManager<F: TokenFlows, S: TokenStore> {
    config: TokenManagerConfig,
    flows: Arc<F>,
    store: Arc<S>,
    logger: Arc<dyn Logger>,
}

impl<F: TokenFlows, S: TokenStore> DefaultTokenManager<F, S> {
    /// Create new token manager.
    pub fn new(
        config: TokenManagerConfig,
        flows: Arc<F>,
        store: Arc<S>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            config,
            flows,
            store,
            logger,
        }
    }

    async fn load_cached(&self, profile: &Profile, ctx: &LogContext) -> Option<TokenRecord> {
        let raw = match self.store.load(&profile.name).await {
            Ok(raw) => raw,
            Err(e) => {
                self.logger.debug(&format!("No cached token: {}", e), ctx);
                return None;
            }
        };

        match TokenRecord::from_cache(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                self.logger
                    .debug(&format!("Discarding unreadable cached token: {}", e), ctx);
                None
            }
        }
    }

    async fn refresh(
        &self,
        profile: &Profile,
        previous: &TokenRecord,
        refresh_token: &str,
    ) -> Result<TokenRecord, AurlError> {
        let mut record = self
            .flows
            .refresh(profile, refresh_token)
            .await
            .map_err(|e| TokenError::RefreshFailed {
                message: e.to_string(),
            })?;

        if !record.has_refresh_token() {
            record.refresh_token = previous.refresh_token.clone();
        }
        Ok(record)
    }

    async fn acquire(&self, profile: &Profile) -> Result<TokenRecord, AurlError> {
        self.flows.acquire(profile).await.map_err(|e| {
            TokenError::AcquireFailed {
                grant_type: profile.grant_type,
                source: Box::new(e),
            }
            .into()
        })
    }

    async fn persist(&self, profile: &Profile, record: &TokenRecord, ctx: &LogContext) {
        let raw = match record.to_json() {
            Ok(raw) => raw,
            Err(e) => {
                self.logger
                    .warn(&format!("Failed to encode token: {}", e), ctx);
                return;
            }
        };

        if let Err(e) = self.store.save(&profile.name, &raw).await {
            self.logger
                .warn(&format!("Failed to save token: {}", e), ctx);
        }
    }
}

#[async_trait]
impl<F: TokenFlows, S: TokenStore> TokenManager for DefaultTokenManager<F, S> {
    async fn get_access_token(&self, profile: &Profile) -> Result<AccessToken, AurlError> {
        let ctx = LogContext::new()
            .profile(profile.name.clone())
            .grant_type(profile.grant_type.as_str());

        if let Some(cached) = self.load_cached(profile, &ctx.clone().operation("load")).await {
            let expired = cached
                .is_expired_within(self.config.refresh_leeway, self.config.missing_expiry);
            if !expired {
                self.logger.debug("Using cached token", &ctx);
                return Ok(cached.access_token());
            }

            match cached.refresh_token.as_deref().filter(|t| !t.is_empty()) {
                Some(refresh_token) => {
                    let refresh_ctx = ctx.clone().operation("refresh");
                    self.logger.debug("Cached token expired, refreshing", &refresh_ctx);
                    match self.refresh(profile, &cached, refresh_token).await {
                        Ok(record) => {
                            self.logger.info("Refreshed token", &refresh_ctx);
                            self.persist(profile, &record, &refresh_ctx).await;
                            return Ok(record.access_token());
                        }
                        Err(e) => {
                            self.logger.warn(
                                &format!("{}, falling back to a new grant", e),
                                &refresh_ctx,
                            );
                        }
                    }
                }
                None => {
                    self.logger
                        .debug("Cached token expired without refresh token", &ctx);
                }
            }
        }

        let acquire_ctx = ctx.operation("acquire");
        self.logger.debug("Requesting new token", &acquire_ctx);
        let record = self.acquire(profile).await?;
        self.logger.info("Acquired new token", &acquire_ctx);
        self.persist(profile, &record, &acquire_ctx).await;
        Ok(record.access_token())
    }
}

/// Mock token manager for testing.
#[derive(Default)]
pub struct MockTokenManager {
    next_token: std::sync::Mutex<Option<AccessToken>>,
    next_error: std::sync::Mutex<Option<AurlError>>,
    request_history: std::sync::Mutex<Vec<String>>,
}

impl MockTokenManager {
    /// Create new mock manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set token returned by subsequent calls.
    pub fn set_access_token(&self, token: AccessToken) -> &Self {
        *self.next_token.lock().unwrap() = Some(token);
        self
    }

    /// Set error returned by the next call.
    pub fn set_next_error(&self, error: AurlError) -> &Self {
        *self.next_error.lock().unwrap() = Some(error);
        self
    }

    /// Profiles a token was requested for.
    pub fn get_request_history(&self) -> Vec<String> {
        self.request_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenManager for MockTokenManager {
    async fn get_access_token(&self, profile: &Profile) -> Result<AccessToken, AurlError> {
        self.request_history
            .lock()
            .unwrap()
            .push(profile.name.clone());

        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }

        self.next_token
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| {
                TokenError::NotFound {
                    profile: profile.name.clone(),
                }
                .into()
            })
    }
}
