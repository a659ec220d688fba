//! Integration tests for the USDCode completion client.
//!
//! The upstream chat-completions endpoint is stubbed with wiremock — model
//! output is not deterministic, so live assertions are never made.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use usdcode_mcp::{
    AskUsdcodeUseCase, CompletionClient, CompletionRequest, ExpertType, UsdcodeClient,
    USDCODE_MODEL,
};

fn client_for(server: &MockServer) -> UsdcodeClient {
    UsdcodeClient::new("test-key", USDCODE_MODEL, server.uri())
}

#[tokio::test]
async fn non_streaming_returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hi there" } }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let content = client
        .complete(&CompletionRequest::new("Hello"))
        .await
        .expect("completion should succeed");
    assert_eq!(content.as_deref(), Some("Hi there"));
}

#[tokio::test]
async fn non_streaming_without_choices_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let content = client
        .complete(&CompletionRequest::new("Hello"))
        .await
        .expect("completion should succeed");
    assert!(content.is_none());
}

#[tokio::test]
async fn null_message_content_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let content = client
        .complete(&CompletionRequest::new("Hello"))
        .await
        .expect("completion should succeed");
    assert!(content.is_none());
}

#[tokio::test]
async fn default_request_sends_documented_parameters() {
    let server = MockServer::start().await;
    // The mock only matches when the defaults are present in the payload;
    // a mismatch falls through to wiremock's 404 and fails the call.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": USDCODE_MODEL,
            "messages": [{ "role": "user", "content": "x" }],
            "temperature": 0.1,
            "top_p": 1.0,
            "max_tokens": 1024,
            "expert_type": "auto",
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "ok" } }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let content = client
        .complete(&CompletionRequest::new("x"))
        .await
        .expect("defaults should match the documented payload");
    assert_eq!(content.as_deref(), Some("ok"));
}

#[tokio::test]
async fn expert_type_and_stream_flag_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "expert_type": "code",
            "stream": true,
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("data: [DONE]\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = CompletionRequest::new("Hello")
        .with_expert_type(ExpertType::Code)
        .with_stream(true);
    client
        .complete_stream(&request)
        .await
        .expect("streaming request should match");
}

#[tokio::test]
async fn streaming_concatenates_deltas_in_delivery_order() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"Hi\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" there\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client
        .complete_stream(&CompletionRequest::new("Hello").with_stream(true))
        .await
        .expect("streaming should succeed");
    assert_eq!(text, "Hi there");
}

#[tokio::test]
async fn streaming_skips_malformed_lines_and_stops_at_done() {
    let server = MockServer::start().await;
    let body = concat!(
        ": keep-alive comment\n\n",
        "data: {not valid json\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n",
        "data: {\"choices\":[{\"finish_reason\":\"stop\",\"delta\":{}}]}\n\n",
        "data: [DONE]\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client
        .complete_stream(&CompletionRequest::new("Hello").with_stream(true))
        .await
        .expect("streaming should succeed");
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn upstream_error_status_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .complete(&CompletionRequest::new("Hello"))
        .await
        .expect_err("401 should propagate as an error");
    assert!(err.is_upstream_error());

    let err = client
        .complete_stream(&CompletionRequest::new("Hello").with_stream(true))
        .await
        .expect_err("401 should propagate as an error");
    assert!(err.is_upstream_error());
}

#[tokio::test]
async fn use_case_substitutes_fallbacks_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("data: [DONE]\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let use_case = AskUsdcodeUseCase::new(Arc::new(client_for(&server)));

    let text = use_case
        .execute(CompletionRequest::new("Hello"))
        .await
        .expect("completion should succeed");
    assert_eq!(text, "No content returned by USDCode.");

    let text = use_case
        .execute(CompletionRequest::new("Hello").with_stream(true))
        .await
        .expect("streaming completion should succeed");
    assert_eq!(text, "No streamed content returned by USDCode.");
}
