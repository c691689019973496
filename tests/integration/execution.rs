//! Integration tests for the authenticated request and response output

use super::*;
use aurl::{
    AurlError, HttpMethod, ProtocolError, TokenError, DEFAULT_USER_AGENT, MAX_TOKEN_RESPONSE_SIZE,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::Mock;

async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(token_response("api-token", None))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_post_with_body_and_headers() {
    let server = setup_mock_server().await;
    let temp = TempDir::new().unwrap();
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/items"))
        .and(header("authorization", "Bearer api-token"))
        .and(header("content-type", "application/json"))
        .and(header("x-request-id", "abc"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .and(body_string(r#"{"name":"widget"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let profile = ProfileBuilder::new()
        .name("service")
        .client_id("svc")
        .token_endpoint(format!("{}/token", server.uri()))
        .grant_type(GrantType::ClientCredentials)
        .default_content_type("application/json")
        .build()
        .unwrap();
    let config = ExecutionConfig {
        method: HttpMethod::Post,
        headers: vec!["X-Request-Id: abc".to_string()],
        data: Some(r#"{"name":"widget"}"#.to_string()),
        ..request_config(&server)
    };

    let execution = build_execution(
        config,
        profile,
        temp.path(),
        ScriptedPrompter::new(),
        Arc::new(InMemoryLogger::new()),
    );
    let mut out = Vec::new();
    let response = execution.execute(&mut out).await.unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(String::from_utf8(out).unwrap(), "created");
}

#[tokio::test]
async fn test_print_headers_before_body() {
    let server = setup_mock_server().await;
    let temp = TempDir::new().unwrap();
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-custom", "yes")
                .set_body_string("payload"),
        )
        .mount(&server)
        .await;

    let config = ExecutionConfig {
        print_headers: true,
        ..request_config(&server)
    };
    let execution = build_execution(
        config,
        service_profile(&server),
        temp.path(),
        ScriptedPrompter::new(),
        Arc::new(InMemoryLogger::new()),
    );
    let mut out = Vec::new();
    execution.execute(&mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    let (headers_line, body) = out.split_once('\n').unwrap();
    let headers: serde_json::Value = serde_json::from_str(headers_line).unwrap();
    assert_eq!(headers["x-custom"], serde_json::json!(["yes"]));
    assert_eq!(body, "payload");
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = setup_mock_server().await;
    let temp = TempDir::new().unwrap();
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/api/elsewhere"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ExecutionConfig {
        print_body: false,
        ..request_config(&server)
    };
    let execution = build_execution(
        config,
        service_profile(&server),
        temp.path(),
        ScriptedPrompter::new(),
        Arc::new(InMemoryLogger::new()),
    );
    let mut out = Vec::new();
    let response = execution.execute(&mut out).await.unwrap();

    assert_eq!(response.status, 302);
    assert_eq!(response.header("location"), Some("/api/elsewhere"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_invalid_header_fails_before_sending() {
    let server = setup_mock_server().await;
    let temp = TempDir::new().unwrap();
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ExecutionConfig {
        headers: vec!["missing-colon".to_string()],
        ..request_config(&server)
    };
    let execution = build_execution(
        config,
        service_profile(&server),
        temp.path(),
        ScriptedPrompter::new(),
        Arc::new(InMemoryLogger::new()),
    );

    assert!(execution.execute(&mut Vec::new()).await.is_err());
}

#[tokio::test]
async fn test_binary_body_written_unchanged() {
    let server = setup_mock_server().await;
    let temp = TempDir::new().unwrap();
    mount_token_endpoint(&server).await;

    let png_header = vec![0x89, 0x50, 0xff, 0x00, 0xfe];
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_header.clone()))
        .mount(&server)
        .await;

    let execution = build_execution(
        request_config(&server),
        service_profile(&server),
        temp.path(),
        ScriptedPrompter::new(),
        Arc::new(InMemoryLogger::new()),
    );
    let mut out = Vec::new();
    let response = execution.execute(&mut out).await.unwrap();

    assert_eq!(response.body, png_header);
    assert_eq!(out, png_header);
}

#[tokio::test]
async fn test_large_body_is_not_capped() {
    let server = setup_mock_server().await;
    let temp = TempDir::new().unwrap();
    mount_token_endpoint(&server).await;

    let large = vec![b'x'; MAX_TOKEN_RESPONSE_SIZE * 2];
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(large.clone()))
        .mount(&server)
        .await;

    let execution = build_execution(
        request_config(&server),
        service_profile(&server),
        temp.path(),
        ScriptedPrompter::new(),
        Arc::new(InMemoryLogger::new()),
    );
    let mut out = Vec::new();
    execution.execute(&mut out).await.unwrap();

    assert_eq!(out.len(), large.len());
}

#[tokio::test]
async fn test_oversized_token_response_is_rejected() {
    let server = setup_mock_server().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(vec![b' '; MAX_TOKEN_RESPONSE_SIZE + 1]),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let execution = build_execution(
        request_config(&server),
        service_profile(&server),
        temp.path(),
        ScriptedPrompter::new(),
        Arc::new(InMemoryLogger::new()),
    );
    let result = execution.execute(&mut Vec::new()).await;

    match result {
        Err(AurlError::Token(TokenError::AcquireFailed { source, .. })) => {
            assert!(matches!(
                *source,
                AurlError::Protocol(ProtocolError::ResponseTooLarge { .. })
            ));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
