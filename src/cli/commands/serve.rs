//! HTTP runner for the agent.
//!
//! Serves the dispatcher's entry point plus an agent card describing the
//! deployment.

use crate::agent::Message;
use crate::cli::Output;
use crate::config::{AgentConfig, DeploymentConfig};
use crate::dispatcher::Dispatcher;
use crate::error::AgentError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

/// Shared application state.
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub config: AgentConfig,
}

/// Run the HTTP server until Ctrl+C.
pub async fn run_serve(config: AgentConfig, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    let addr = config.deployment.bind_addr()?;
    if !config.deployment.proxy_urls.is_empty() {
        info!("Trusted proxies: {}", config.deployment.proxy_urls.join(", "));
    }

    let url = config.deployment.url.clone();
    let app = router(Arc::new(AppState { dispatcher, config }));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::success(&format!("Listening on http://{}", addr));
    Output::info(&format!("Access at: {}", url));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Agent card", "GET  /.well-known/agent.json");
    Output::kv("Messages", "POST /messages");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.deployment);

    Router::new()
        .route("/health", get(health))
        .route("/.well-known/agent.json", get(agent_card))
        .route("/messages", post(messages))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(deployment: &DeploymentConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if deployment.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = deployment
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct MessagesRequest {
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AgentCard {
    name: String,
    description: String,
    version: String,
    url: String,
    protocol_version: String,
    default_input_modes: Vec<&'static str>,
    default_output_modes: Vec<&'static str>,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

/// Map a dispatcher error to an HTTP status.
fn status_for(error: &AgentError) -> StatusCode {
    if error.is_retryable() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    match error {
        AgentError::AgentUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        AgentError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "agent_initialized": state.dispatcher.is_initialized(),
    }))
}

async fn agent_card(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &state.config;
    Json(AgentCard {
        name: config.name.clone(),
        description: config.description.clone(),
        version: config.version.clone(),
        url: config.deployment.url.clone(),
        protocol_version: config.deployment.protocol_version.clone(),
        default_input_modes: vec!["text/plain"],
        default_output_modes: vec!["text/markdown"],
    })
}

async fn messages(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MessagesRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    if req.messages.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "messages must not be empty".to_string());
    }

    match state.dispatcher.handle(req.messages).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            error!("Request failed: {}", e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&AgentError::MissingCredential("key".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&AgentError::Capability("yt-dlp missing".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_for(&AgentError::AgentUnavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_for(&AgentError::InvalidInput("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AgentError::OpenAI("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
