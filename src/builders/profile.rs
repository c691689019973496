//! Profile Builder
//!
//! Fluent builder for OAuth2 profiles, used by the profile file reader and by
//! callers that assemble a profile in code.

use secrecy::SecretString;
use url::Url;

use crate::error::{AurlError, ConfigurationError};
use crate::types::{ClientAuthMethod, GrantType, Profile, DEFAULT_PROFILE};

/// Redirect URI used when the profile does not name one.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Profile builder.
#[derive(Default)]
pub struct ProfileBuilder {
    name: Option<String>,
    authorization_endpoint: Option<String>,
    token_endpoint: Option<String>,
    redirect_uri: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    auth_method: Option<ClientAuthMethod>,
    grant_type: Option<GrantType>,
    scopes: Vec<String>,
    username: Option<String>,
    password: Option<SecretString>,
    default_content_type: Option<String>,
    default_user_agent: Option<String>,
}

impl ProfileBuilder {
    /// Create new profile builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set profile name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set authorization endpoint.
    pub fn authorization_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorization_endpoint = Some(endpoint.into());
        self
    }

    /// Set token endpoint.
    pub fn token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(endpoint.into());
        self
    }

    /// Set redirect URI.
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set client authentication method.
    pub fn auth_method(mut self, method: ClientAuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Set grant type.
    pub fn grant_type(mut self, grant_type: GrantType) -> Self {
        self.grant_type = Some(grant_type);
        self
    }

    /// Set scopes.
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Add a scope.
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Set resource owner username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set resource owner password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set default Content-Type.
    pub fn default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.default_content_type = Some(content_type.into());
        self
    }

    /// Set default User-Agent.
    pub fn default_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.default_user_agent = Some(user_agent.into());
        self
    }

    /// Build the profile.
    pub fn build(self) -> Result<Profile, AurlError> {
        let client_id = self
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ConfigurationError::MissingRequired {
                field: "client_id".to_string(),
            })?;

        let token_endpoint = self.token_endpoint.ok_or_else(|| {
            ConfigurationError::MissingRequired {
                field: "auth_server_token_endpoint".to_string(),
            }
        })?;
        validate_endpoint(&token_endpoint)?;

        let grant_type = self.grant_type.unwrap_or(GrantType::AuthorizationCode);

        let authorization_endpoint = self.authorization_endpoint.unwrap_or_default();
        if grant_type == GrantType::AuthorizationCode {
            if authorization_endpoint.is_empty() {
                return Err(ConfigurationError::MissingRequired {
                    field: "auth_server_auth_endpoint".to_string(),
                }
                .into());
            }
            validate_endpoint(&authorization_endpoint)?;
        }

        Ok(Profile {
            name: self.name.unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            authorization_endpoint,
            token_endpoint,
            redirect_uri: self.redirect_uri,
            client_id,
            client_secret: self.client_secret,
            auth_method: self.auth_method.unwrap_or_default(),
            grant_type,
            scopes: self.scopes,
            username: self.username,
            password: self.password,
            default_content_type: self.default_content_type,
            default_user_agent: self.default_user_agent,
        })
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigurationError> {
    match Url::parse(endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigurationError::InvalidEndpoint {
            url: endpoint.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_success() {
        let profile = ProfileBuilder::new()
            .name("work")
            .client_id("test-client")
            .client_secret("test-secret")
            .authorization_endpoint("https://example.com/authorize")
            .token_endpoint("https://example.com/token")
            .add_scope("read")
            .add_scope("write")
            .build()
            .unwrap();

        assert_eq!(profile.name, "work");
        assert_eq!(profile.client_id, "test-client");
        assert_eq!(profile.grant_type, GrantType::AuthorizationCode);
        assert_eq!(profile.auth_method, ClientAuthMethod::ClientSecretBasic);
        assert_eq!(profile.scope_param(), Some("read write".to_string()));
    }

    #[test]
    fn test_builder_missing_client_id() {
        let result = ProfileBuilder::new()
            .token_endpoint("https://example.com/token")
            .grant_type(GrantType::ClientCredentials)
            .build();

        assert!(matches!(
            result,
            Err(AurlError::Configuration(ConfigurationError::MissingRequired { .. }))
        ));
    }

    #[test]
    fn test_builder_invalid_token_endpoint() {
        let result = ProfileBuilder::new()
            .client_id("test-client")
            .token_endpoint("not a url")
            .grant_type(GrantType::ClientCredentials)
            .build();

        assert!(matches!(
            result,
            Err(AurlError::Configuration(ConfigurationError::InvalidEndpoint { .. }))
        ));
    }

    #[test]
    fn test_authorization_endpoint_required_for_code_grant() {
        let result = ProfileBuilder::new()
            .client_id("test-client")
            .token_endpoint("https://example.com/token")
            .build();
        assert!(result.is_err());

        let profile = ProfileBuilder::new()
            .client_id("test-client")
            .token_endpoint("https://example.com/token")
            .grant_type(GrantType::Password)
            .build()
            .unwrap();
        assert!(profile.authorization_endpoint.is_empty());
        assert_eq!(profile.name, DEFAULT_PROFILE);
    }
}
