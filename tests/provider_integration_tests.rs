use std::net::IpAddr;
use std::sync::Arc;

use eeon::core::emoji::EmojiLimit;
use eeon::core::prompt::InstructionTemplate;
use eeon::inference::{GeminiProvider, GenerationProvider, GenerationRequest, PromptComposer, ProviderError};
use eeon::visitors::{GeoLookup, VisitorError};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

const GENERATE_PATH: &str = "/models/gemini-pro:generateContent";

fn provider_for(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new(Some("test-key".to_string()), Some(server.uri()), None)
}

fn candidate(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": text }] }, "finishReason": "STOP" }
        ]
    })
}

// ============================================================================
// Gemini Provider Tests
// ============================================================================

#[tokio::test]
async fn test_gemini_returns_first_candidate_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("# Hi\n> 👋\nHello")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let reply = provider
        .generate(GenerationRequest { prompt: "hello" })
        .await
        .unwrap();

    assert_eq!(reply.as_deref(), Some("# Hi\n> 👋\nHello"));
}

#[tokio::test]
async fn test_gemini_without_candidates_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let reply = provider
        .generate(GenerationRequest { prompt: "hello" })
        .await
        .unwrap();
    assert_eq!(reply, None);
}

#[tokio::test]
async fn test_gemini_http_error_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let result = provider.generate(GenerationRequest { prompt: "hello" }).await;

    match result {
        Err(ProviderError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("backend exploded"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gemini_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let result = provider.generate(GenerationRequest { prompt: "hello" }).await;
    assert!(matches!(result, Err(ProviderError::Parse(_))));
}

#[tokio::test]
async fn test_composer_sends_instruction_with_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "Use at most 10 emoji. why" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("# Why\n> ❓")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let composer = PromptComposer::new(
        Arc::new(provider_for(&mock_server)),
        InstructionTemplate::new("Use at most {emoji_limit} emoji. "),
    );
    let reply = composer.compose("why", EmojiLimit::clamped(15)).await;
    assert_eq!(reply, "# Why\n> ❓");
}

#[tokio::test]
async fn test_composer_maps_empty_and_failed_replies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({ "contents": [{ "parts": [{ "text": "empty" }] }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({ "contents": [{ "parts": [{ "text": "boom" }] }] })))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let composer = PromptComposer::new(Arc::new(provider_for(&mock_server)), InstructionTemplate::new(""));

    assert_eq!(composer.compose("empty", EmojiLimit::default()).await, "No response.");
    let failed = composer.compose("boom", EmojiLimit::default()).await;
    assert!(failed.starts_with("Error occurred."), "got: {failed}");
}

// ============================================================================
// Geolocation Tests
// ============================================================================

#[tokio::test]
async fn test_geo_lookup_for_known_ip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/203.0.113.9/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "203.0.113.9",
            "country_name": "Iceland",
            "city": "Reykjavik"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ip: IpAddr = "203.0.113.9".parse().unwrap();
    let info = GeoLookup::new(mock_server.uri()).lookup(Some(ip)).await.unwrap();
    assert_eq!(info.ip, "203.0.113.9");
    assert_eq!(info.country, "Iceland");
}

#[tokio::test]
async fn test_geo_self_lookup_uses_reported_ip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "198.51.100.7",
            "country_name": "Chile"
        })))
        .mount(&mock_server)
        .await;

    let info = GeoLookup::new(format!("{}/", mock_server.uri())).lookup(None).await.unwrap();
    assert_eq!(info.ip, "198.51.100.7");
    assert_eq!(info.country, "Chile");
}

#[tokio::test]
async fn test_geo_error_body_keeps_known_ip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/10.0.0.1/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true,
            "reason": "Reserved IP Address"
        })))
        .mount(&mock_server)
        .await;

    let ip: IpAddr = "10.0.0.1".parse().unwrap();
    let info = GeoLookup::new(mock_server.uri()).lookup(Some(ip)).await.unwrap();
    assert_eq!(info.ip, "10.0.0.1");
    assert_eq!(info.country, "Unknown");
}

#[tokio::test]
async fn test_geo_self_lookup_failure_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let result = GeoLookup::new(mock_server.uri()).lookup(None).await;
    assert!(matches!(result, Err(VisitorError::Lookup(msg)) if msg.contains("429")));
}
