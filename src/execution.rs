//! Execution
//!
//! Resolves a token for the profile, sends the authenticated request and
//! prints the response.

use std::io::Write;
use std::sync::Arc;

use crate::core::{
    create_transport, HttpRequest, HttpResponse, HttpTransport, ReqwestHttpTransport,
    TransportOptions,
};
use crate::error::{AurlError, ConfigurationError, ProtocolError};
use crate::flows::{FlowCredentials, OAuth2Flows, TokenEndpoint};
use crate::prompt::{CredentialPrompter, TerminalPrompter};
use crate::telemetry::{LogContext, LogLevel, Logger, TracingLogger};
use crate::token::{DefaultTokenManager, FileTokenStore, TokenManager, TokenManagerConfig};
use crate::types::{AccessToken, ExecutionConfig, Profile};

/// `User-Agent` sent when neither the request nor the profile names one.
pub const DEFAULT_USER_AGENT: &str = concat!("aurl/", env!("CARGO_PKG_VERSION"));

/// Production token manager.
pub type FileTokenManager = DefaultTokenManager<OAuth2Flows<ReqwestHttpTransport>, FileTokenStore>;

/// One aurl invocation.
pub struct AurlExecution<T: HttpTransport, M: TokenManager> {
    config: ExecutionConfig,
    profile: Profile,
    transport: Arc<T>,
    token_manager: Arc<M>,
    logger: Arc<dyn Logger>,
}

impl AurlExecution<ReqwestHttpTransport, FileTokenManager> {
    /// Create an execution with the reqwest transport, the file token store
    /// and terminal prompting.
    pub fn new(config: ExecutionConfig, profile: Profile) -> Result<Self, AurlError> {
        let transport = Arc::new(create_transport(TransportOptions {
            timeout: config.timeout,
            insecure: config.insecure,
        })?);
        let prompter: Arc<dyn CredentialPrompter> = Arc::new(TerminalPrompter::new());
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());

        let credentials = FlowCredentials::new(prompter)
            .prompt_client_secret(config.prompt_client_secret)
            .prompt_password(config.prompt_password);
        let flows = OAuth2Flows::new(
            TokenEndpoint::new(transport.clone()).with_timeout(config.timeout),
            credentials,
        );
        let token_manager = DefaultTokenManager::new(
            TokenManagerConfig {
                refresh_leeway: config.refresh_leeway,
                missing_expiry: config.missing_expiry,
            },
            Arc::new(flows),
            Arc::new(FileTokenStore::new()?),
            logger.clone(),
        );

        Ok(Self::with_components(
            config,
            profile,
            transport,
            Arc::new(token_manager),
            logger,
        ))
    }
}

impl<T: HttpTransport, M: TokenManager> AurlExecution<T, M> {
    /// Create an execution with custom components.
    pub fn with_components(
        config: ExecutionConfig,
        profile: Profile,
        transport: Arc<T>,
        token_manager: Arc<M>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            config,
            profile,
            transport,
            token_manager,
            logger,
        }
    }

    /// Run the invocation, writing the response to `out`.
    pub async fn execute<W: Write>(&self, out: &mut W) -> Result<HttpResponse, AurlError> {
        let token = self.token_manager.get_access_token(&self.profile).await?;
        let request = self.build_request(&token)?;

        let ctx = self.logger.is_enabled(LogLevel::Debug).then(|| {
            LogContext::new()
                .profile(self.profile.name.clone())
                .operation("request")
                .extra("method", request.method.as_str())
                .extra("url", request.url.clone())
        });
        if let Some(ctx) = &ctx {
            self.logger.debug("Sending request", ctx);
        }

        let response = self.transport.send(request).await?;
        if let Some(ctx) = ctx {
            self.logger.debug(
                &format!("Response status {}", response.status),
                &ctx.extra("status", response.status.to_string()),
            );
        }

        write_response(&response, &self.config, out)?;
        Ok(response)
    }

    /// Build the outbound request for an access token.
    pub fn build_request(&self, token: &AccessToken) -> Result<HttpRequest, AurlError> {
        let mut headers = self
            .config
            .headers
            .iter()
            .map(|raw| parse_header(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let has = |headers: &[(String, String)], name: &str| {
            headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
        };

        if self.config.data.is_some() && !has(&headers, "content-type") {
            if let Some(content_type) = &self.profile.default_content_type {
                headers.push(("Content-Type".to_string(), content_type.clone()));
            }
        }

        if !has(&headers, "user-agent") {
            let user_agent = self
                .profile
                .default_user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
            headers.push(("User-Agent".to_string(), user_agent));
        }

        headers.retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
        headers.push(("Authorization".to_string(), token.authorization_header()));

        Ok(HttpRequest {
            method: self.config.method,
            url: self.config.target_url.clone(),
            headers,
            body: self.config.data.clone(),
            timeout: Some(self.config.timeout),
            max_response_size: None,
        })
    }
}

/// Parse a `Name: Value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String), AurlError> {
    let invalid = || ConfigurationError::InvalidHeader {
        header: raw.to_string(),
    };

    let (name, value) = raw.split_once(':').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid().into());
    }

    Ok((name.to_string(), value.trim().to_string()))
}

/// Print response headers (as a JSON object of arrays) and body.
pub fn write_response<W: Write>(
    response: &HttpResponse,
    config: &ExecutionConfig,
    out: &mut W,
) -> Result<(), AurlError> {
    if config.print_headers {
        let headers =
            serde_json::to_string(&response.header_map()).map_err(|e| ProtocolError::InvalidJson {
                message: e.to_string(),
            })?;
        writeln!(out, "{}", headers)?;
    }

    if config.print_body {
        out.write_all(&response.body)?;
    }

    out.flush()?;
    Ok(())
}
