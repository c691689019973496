//! Flow Credentials
//!
//! Resolves client secret and password from the profile, falling back to the
//! prompter only when the matching prompt flag is set.

use secrecy::SecretString;
use std::sync::{Arc, OnceLock};

use crate::error::{AurlError, ConfigurationError};
use crate::prompt::CredentialPrompter;
use crate::types::Profile;

/// Credential resolution for grant flows.
#[derive(Clone)]
pub struct FlowCredentials {
    prompter: Arc<dyn CredentialPrompter>,
    prompt_client_secret: bool,
    prompt_password: bool,
    // A prompted secret is asked for once per invocation
    prompted_secret: OnceLock<SecretString>,
}

impl FlowCredentials {
    /// Create credential resolution with prompting disabled.
    pub fn new(prompter: Arc<dyn CredentialPrompter>) -> Self {
        Self {
            prompter,
            prompt_client_secret: false,
            prompt_password: false,
            prompted_secret: OnceLock::new(),
        }
    }

    /// Prompt for the client secret when the profile has none.
    pub fn prompt_client_secret(mut self, enabled: bool) -> Self {
        self.prompt_client_secret = enabled;
        self
    }

    /// Prompt for the password when the profile has none.
    pub fn prompt_password(mut self, enabled: bool) -> Self {
        self.prompt_password = enabled;
        self
    }

    /// Client secret, or `None` for a public client.
    pub fn client_secret(&self, profile: &Profile) -> Result<Option<SecretString>, AurlError> {
        if let Some(secret) = &profile.client_secret {
            return Ok(Some(secret.clone()));
        }
        if !self.prompt_client_secret {
            return Ok(None);
        }
        if let Some(secret) = self.prompted_secret.get() {
            return Ok(Some(secret.clone()));
        }

        let secret = self.prompter.client_secret(&profile.name)?;
        Ok(Some(self.prompted_secret.get_or_init(|| secret).clone()))
    }

    /// Resource owner password.
    pub fn password(&self, profile: &Profile, username: &str) -> Result<SecretString, AurlError> {
        if let Some(password) = &profile.password {
            return Ok(password.clone());
        }
        if self.prompt_password {
            return self.prompter.password(username);
        }
        Err(ConfigurationError::MissingRequired {
            field: "password".to_string(),
        }
        .into())
    }

    /// Authorization code pasted back after visiting `authorization_url`.
    pub fn authorization_code(&self, authorization_url: &str) -> Result<String, AurlError> {
        self.prompter.authorization_code(authorization_url)
    }
}
