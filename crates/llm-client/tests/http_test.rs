//! Integration tests for `OpenAiClient` against a local stub server.
//!
//! Each test starts an axum app on a random port and points the real
//! reqwest-backed client at it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use llm_client::{ChatCompletion, CompletionRequest, LlmClientError, OpenAiClient};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
}

/// Start a stub app on a random port and return its base URL
async fn spawn_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Failed to get local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });

    format!("http://{}/v1", addr)
}

async fn reply_with_title(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    recorded.auth_headers.lock().unwrap().push(auth);
    recorded.bodies.lock().unwrap().push(body);

    Json(json!({
        "id": "chatcmpl-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": "  Cinema Paradiso \n" } }
        ]
    }))
}

fn client_for(base_url: &str, timeout: Duration) -> OpenAiClient {
    OpenAiClient::new(base_url, "sk-test", "gpt-4o-mini", timeout).expect("client")
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_complete_sends_single_user_message() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(reply_with_title))
        .with_state(recorded.clone());
    let base_url = spawn_stub(app).await;

    let client = client_for(&base_url, Duration::from_secs(5));
    let reply = client
        .complete(CompletionRequest::new("suggest a movie", 0.7, 50))
        .await
        .expect("completion failed");

    assert_eq!(reply, "Cinema Paradiso");

    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 50);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "suggest a movie");

    let auth = recorded.auth_headers.lock().unwrap();
    assert_eq!(auth[0], "Bearer sk-test");
}

#[tokio::test]
async fn test_error_status_is_reported_with_provider_message() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": { "message": "Rate limit reached", "type": "requests" } })),
            )
        }),
    );
    let base_url = spawn_stub(app).await;

    let err = client_for(&base_url, Duration::from_secs(5))
        .complete(CompletionRequest::new("x", 0.0, 5))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LlmClientError::Status {
            status: 429,
            message: Some("Rate limit reached".to_string()),
        }
    );
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::OK, "this is not json") }),
    );
    let base_url = spawn_stub(app).await;

    let err = client_for(&base_url, Duration::from_secs(5))
        .complete(CompletionRequest::new("x", 0.0, 5))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmClientError::InvalidResponse(_)), "got {:?}", err);
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{}/v1", addr), Duration::from_secs(5))
        .complete(CompletionRequest::new("x", 0.0, 5))
        .await
        .unwrap_err();

    assert!(err.is_network(), "got {:?}", err);
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "choices": [] }))
        }),
    );
    let base_url = spawn_stub(app).await;

    let err = client_for(&base_url, Duration::from_millis(100))
        .complete(CompletionRequest::new("x", 0.0, 5))
        .await
        .unwrap_err();

    assert!(err.is_network(), "got {:?}", err);
}
