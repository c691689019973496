//! Integration tests using WireMock
//!
//! Full invocations against a mock provider and API: token endpoint
//! negotiation, the token file cache and the authenticated request.

mod execution;
mod token_lifecycle;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use aurl::{
    AurlExecution, DefaultTokenManager, ExecutionConfig, FileTokenStore, FlowCredentials,
    GrantType, InMemoryLogger, OAuth2Flows, Profile, ProfileBuilder, ReqwestHttpTransport,
    ScriptedPrompter, TokenEndpoint, TokenManagerConfig,
};
use wiremock::{MockServer, ResponseTemplate};

pub type TestExecution = AurlExecution<
    ReqwestHttpTransport,
    DefaultTokenManager<OAuth2Flows<ReqwestHttpTransport>, FileTokenStore>,
>;

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client credentials profile pointing at the mock server.
pub fn service_profile(server: &MockServer) -> Profile {
    ProfileBuilder::new()
        .name("service")
        .client_id("svc")
        .client_secret("svc-secret")
        .token_endpoint(format!("{}/token", server.uri()))
        .grant_type(GrantType::ClientCredentials)
        .add_scope("read")
        .build()
        .unwrap()
}

/// Target request configuration.
pub fn request_config(server: &MockServer) -> ExecutionConfig {
    ExecutionConfig {
        profile_name: "service".to_string(),
        target_url: format!("{}/api/items", server.uri()),
        timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

/// Execution wired to the real transport and a token directory.
pub fn build_execution(
    config: ExecutionConfig,
    profile: Profile,
    token_dir: &Path,
    prompter: ScriptedPrompter,
    logger: Arc<InMemoryLogger>,
) -> TestExecution {
    let transport = Arc::new(ReqwestHttpTransport::new().unwrap());
    let flows = OAuth2Flows::new(
        TokenEndpoint::new(transport.clone()),
        FlowCredentials::new(Arc::new(prompter))
            .prompt_client_secret(config.prompt_client_secret)
            .prompt_password(config.prompt_password),
    );
    let manager = DefaultTokenManager::new(
        TokenManagerConfig {
            refresh_leeway: config.refresh_leeway,
            missing_expiry: config.missing_expiry,
        },
        Arc::new(flows),
        Arc::new(FileTokenStore::with_dir(token_dir)),
        logger.clone(),
    );
    AurlExecution::with_components(config, profile, transport, Arc::new(manager), logger)
}

/// Helper to create success token responses
pub fn token_response(access_token: &str, refresh_token: Option<&str>) -> ResponseTemplate {
    let mut body = serde_json::json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600
    });
    if let Some(refresh_token) = refresh_token {
        body["refresh_token"] = serde_json::json!(refresh_token);
    }
    ResponseTemplate::new(200).set_body_json(body)
}

/// Helper to create error response templates
pub fn error_response(status: u16, error_body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(error_body)
}
