//! Token Types
//!
//! Token record parsed from a provider response and persisted per profile.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AurlError, TokenError};

/// How to treat a token whose response carried no lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingExpiry {
    /// Use the token until the provider rejects it.
    #[default]
    NeverExpires,
    /// Refresh or re-acquire on every invocation.
    TreatAsExpired,
}

/// Token record.
///
/// Field names match the provider's token response so that the same JSON
/// shape is accepted from the token endpoint and from the token file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Lifetime in seconds, as spelled by some providers (Facebook).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    /// Acquisition time, seconds since epoch.
    #[serde(default)]
    pub timestamp: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenRecord {
    /// Parse a token endpoint response.
    ///
    /// The record is stamped with the current time; a `timestamp` present in
    /// the payload is ignored.
    pub fn parse(raw: Option<&str>) -> Result<Self, AurlError> {
        let mut record = Self::decode(raw)?;
        record.timestamp = Utc::now().timestamp();
        Ok(record)
    }

    /// Decode a record previously written to the token store, keeping its
    /// persisted timestamp.
    pub fn from_cache(raw: &str) -> Result<Self, AurlError> {
        Self::decode(Some(raw))
    }

    fn decode(raw: Option<&str>) -> Result<Self, AurlError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
            TokenError::Parse {
                message: "empty token response".to_string(),
            }
        })?;

        let record: TokenRecord = serde_json::from_str(raw).map_err(|e| TokenError::Parse {
            message: e.to_string(),
        })?;

        if record.access_token.is_empty() {
            return Err(TokenError::Parse {
                message: "access_token is empty".to_string(),
            }
            .into());
        }

        Ok(record)
    }

    /// Serialize for the token store.
    pub fn to_json(&self) -> Result<String, AurlError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TokenError::Parse {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Token lifetime in seconds, preferring `expires_in` over `expires`.
    pub fn lifetime_secs(&self) -> Option<i64> {
        self.expires_in
            .filter(|secs| *secs > 0)
            .or(self.expires.filter(|secs| *secs > 0))
    }

    /// Expiry instant, seconds since epoch.
    pub fn expires_at(&self) -> Option<i64> {
        self.lifetime_secs()
            .map(|secs| self.timestamp.saturating_add(secs))
    }

    /// Check if token is expired, treating a missing lifetime as never
    /// expiring.
    pub fn is_expired(&self) -> bool {
        self.is_expired_within(Duration::ZERO, MissingExpiry::NeverExpires)
    }

    /// Check if token expires within `leeway` from now.
    pub fn is_expired_within(&self, leeway: Duration, missing: MissingExpiry) -> bool {
        self.is_expired_at(Utc::now().timestamp(), leeway, missing)
    }

    fn is_expired_at(&self, now: i64, leeway: Duration, missing: MissingExpiry) -> bool {
        match self.expires_at() {
            Some(expires_at) => {
                let leeway = i64::try_from(leeway.as_secs()).unwrap_or(i64::MAX);
                now.saturating_add(leeway) >= expires_at
            }
            None => missing == MissingExpiry::TreatAsExpired,
        }
    }

    /// Check if has refresh token.
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }

    /// Access token for the outbound request.
    pub fn access_token(&self) -> AccessToken {
        AccessToken::new(self.access_token.clone(), self.token_type.clone())
    }
}

impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_in", &self.expires_in)
            .field("expires", &self.expires)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// Access token wrapper for safe handling.
#[derive(Clone)]
pub struct AccessToken {
    /// Token value (secret).
    value: SecretString,
    /// Token type.
    pub token_type: String,
}

impl AccessToken {
    /// Create new access token.
    pub fn new(value: String, token_type: String) -> Self {
        Self {
            value: SecretString::new(value),
            token_type,
        }
    }

    /// Get token value.
    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        let scheme = if self.token_type.is_empty() || self.token_type.eq_ignore_ascii_case("bearer")
        {
            "Bearer"
        } else {
            self.token_type.as_str()
        };
        format!("{} {}", scheme, self.value.expose_secret())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}
