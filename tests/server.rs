//! HTTP runner routes.

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use youtube_agent::agent::{AgentRunResponse, Message, RunStatus};
use youtube_agent::cli::commands::{router, AppState};
use youtube_agent::config::{AgentConfig, EnvSource};
use youtube_agent::dispatcher::{AgentRuntime, Dispatcher};
use youtube_agent::initializer::Initializer;
use youtube_agent::Result;

struct EchoAgent;

#[async_trait]
impl AgentRuntime for EchoAgent {
    async fn run(&self, messages: &[Message]) -> Result<AgentRunResponse> {
        Ok(AgentRunResponse {
            run_id: "youtube-run-id".to_string(),
            agent_name: "YouTube Video Analyst".to_string(),
            model: "stub/model".to_string(),
            content: format!("echo: {}", messages.last().map(|m| m.content.as_str()).unwrap_or("")),
            status: RunStatus::Completed,
            tool_calls: Vec::new(),
            iterations: 1,
            created_at: chrono::Utc::now(),
        })
    }
}

fn app(dispatcher: Dispatcher) -> axum::Router {
    router(Arc::new(AppState {
        dispatcher: Arc::new(dispatcher),
        config: AgentConfig::default(),
    }))
}

async fn send(app: axum::Router, request: Request<axum::body::Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(request).await.expect("app should handle request");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("response body should be readable");
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

fn post_json(uri: &str, payload: Value) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(payload.to_string()))
        .expect("request build should succeed")
}

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .expect("request build should succeed")
}

#[tokio::test]
async fn test_messages_returns_agent_response() {
    let app = app(Dispatcher::with_agent(Arc::new(EchoAgent)));

    let (status, body) = send(
        app,
        post_json(
            "/messages",
            json!({"messages": [{"role": "user", "content": "Analyze this video: https://www.youtube.com/watch?v=zjkBMFhNj_g"}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["run_id"], "youtube-run-id");
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(
        body["content"],
        "echo: Analyze this video: https://www.youtube.com/watch?v=zjkBMFhNj_g"
    );
}

#[tokio::test]
async fn test_empty_messages_rejected() {
    let app = app(Dispatcher::with_agent(Arc::new(EchoAgent)));

    let (status, body) = send(app, post_json("/messages", json!({"messages": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_malformed_body_gets_error_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/messages")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"messages\": [oops"))
        .expect("request build should succeed");

    let (status, body) = send(app(Dispatcher::with_agent(Arc::new(EchoAgent))), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["error"].as_str().unwrap().is_empty());

    let (status, body) = send(
        app(Dispatcher::with_agent(Arc::new(EchoAgent))),
        post_json("/messages", json!({"prompt": "Summarize this video"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("messages"));
}

#[tokio::test]
async fn test_missing_credential_is_service_unavailable() {
    let env: Arc<dyn EnvSource> = Arc::new(HashMap::<String, String>::new());
    let dispatcher = Dispatcher::new(Arc::new(Initializer::new(env)));
    let app = app(dispatcher);

    let (status, body) = send(
        app,
        post_json("/messages", json!({"messages": [{"role": "user", "content": "Test"}]})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("OPENROUTER_API_KEY"));
}

#[tokio::test]
async fn test_health_reports_initialization() {
    let (status, body) = send(app(Dispatcher::with_agent(Arc::new(EchoAgent))), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["agent_initialized"], true);
}

#[tokio::test]
async fn test_agent_card() {
    let (status, body) = send(
        app(Dispatcher::with_agent(Arc::new(EchoAgent))),
        get("/.well-known/agent.json"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "youtube-agent");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["url"], "http://127.0.0.1:3773");
    assert_eq!(body["protocolVersion"], "1.0.0");
}
