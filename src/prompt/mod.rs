//! Credential Prompting
//!
//! Interactive input needed by the acquisition grants: client secret,
//! resource owner password and the authorization code pasted back from the
//! browser.

use secrecy::SecretString;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{AurlError, PromptError};

/// Credential prompter interface.
pub trait CredentialPrompter: Send + Sync {
    /// Ask for the client secret of a profile.
    fn client_secret(&self, profile: &str) -> Result<SecretString, AurlError>;

    /// Ask for the resource owner password.
    fn password(&self, username: &str) -> Result<SecretString, AurlError>;

    /// Show the authorization URL and read back the authorization code.
    fn authorization_code(&self, authorization_url: &str) -> Result<String, AurlError>;
}

/// Terminal prompter reading from the controlling TTY.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Create new terminal prompter.
    pub fn new() -> Self {
        Self
    }

    fn hidden(prompt: String, what: &str) -> Result<SecretString, AurlError> {
        let value = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(false)
            .interact()
            .map_err(|e| map_dialoguer_error(e, what))?;
        Ok(SecretString::new(value))
    }
}

fn map_dialoguer_error(error: dialoguer::Error, what: &str) -> AurlError {
    match error {
        dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
            PromptError::Cancelled {
                what: what.to_string(),
            }
            .into()
        }
        dialoguer::Error::IO(e) => PromptError::Io {
            message: e.to_string(),
        }
        .into(),
    }
}

impl CredentialPrompter for TerminalPrompter {
    fn client_secret(&self, profile: &str) -> Result<SecretString, AurlError> {
        Self::hidden(format!("Client secret for profile '{}'", profile), "client secret")
    }

    fn password(&self, username: &str) -> Result<SecretString, AurlError> {
        Self::hidden(format!("Password for {}", username), "password")
    }

    fn authorization_code(&self, authorization_url: &str) -> Result<String, AurlError> {
        eprintln!("Open the following URL in your browser and authorize access:");
        eprintln!();
        eprintln!("  {}", authorization_url);
        eprintln!();

        let code: String = dialoguer::Input::new()
            .with_prompt("Enter verification code")
            .interact_text()
            .map_err(|e| map_dialoguer_error(e, "authorization code"))?;

        let code = code.trim();
        if code.is_empty() {
            return Err(PromptError::Empty {
                what: "authorization code".to_string(),
            }
            .into());
        }
        Ok(code.to_string())
    }
}

/// Prompt kinds recorded by [`ScriptedPrompter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptRequest {
    ClientSecret { profile: String },
    Password { username: String },
    AuthorizationCode { url: String },
}

/// Non-interactive prompter answering from queued values.
///
/// A prompt with no queued answer fails as cancelled.
#[derive(Default)]
pub struct ScriptedPrompter {
    client_secrets: Mutex<VecDeque<String>>,
    passwords: Mutex<VecDeque<String>>,
    codes: Mutex<VecDeque<String>>,
    history: Mutex<Vec<PromptRequest>>,
}

impl ScriptedPrompter {
    /// Create new scripted prompter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a client secret answer.
    pub fn with_client_secret(self, secret: impl Into<String>) -> Self {
        self.client_secrets.lock().unwrap().push_back(secret.into());
        self
    }

    /// Queue a password answer.
    pub fn with_password(self, password: impl Into<String>) -> Self {
        self.passwords.lock().unwrap().push_back(password.into());
        self
    }

    /// Queue an authorization code answer.
    pub fn with_authorization_code(self, code: impl Into<String>) -> Self {
        self.codes.lock().unwrap().push_back(code.into());
        self
    }

    /// Get prompt history.
    pub fn get_history(&self) -> Vec<PromptRequest> {
        self.history.lock().unwrap().clone()
    }

    fn answer(queue: &Mutex<VecDeque<String>>, what: &str) -> Result<String, AurlError> {
        queue.lock().unwrap().pop_front().ok_or_else(|| {
            PromptError::Cancelled {
                what: what.to_string(),
            }
            .into()
        })
    }
}

impl CredentialPrompter for ScriptedPrompter {
    fn client_secret(&self, profile: &str) -> Result<SecretString, AurlError> {
        self.history.lock().unwrap().push(PromptRequest::ClientSecret {
            profile: profile.to_string(),
        });
        Self::answer(&self.client_secrets, "client secret").map(SecretString::new)
    }

    fn password(&self, username: &str) -> Result<SecretString, AurlError> {
        self.history.lock().unwrap().push(PromptRequest::Password {
            username: username.to_string(),
        });
        Self::answer(&self.passwords, "password").map(SecretString::new)
    }

    fn authorization_code(&self, authorization_url: &str) -> Result<String, AurlError> {
        self.history
            .lock()
            .unwrap()
            .push(PromptRequest::AuthorizationCode {
                url: authorization_url.to_string(),
            });
        Self::answer(&self.codes, "authorization code")
    }
}
