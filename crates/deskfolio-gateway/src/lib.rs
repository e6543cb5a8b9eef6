//! `POST /api/chat`: relays the terminal's conversation to an upstream model
//! and answers with one assistant message.
//!
//! The service is stateless; every request is handled independently against
//! a shared `CompletionGateway` (normally a `PersonaGateway` over an
//! `UpstreamModel`).

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;

use deskfolio_core::{ChatFailure, ChatReply, ChatRequest, CompletionGateway, GatewayError};

pub const CHAT_PATH: &str = "/api/chat";

/// Error body for upstream failures; the cause is logged, never returned
pub const GENERATION_FAILED: &str = "Failed to generate response";

pub type SharedGateway = Arc<dyn CompletionGateway>;

pub fn router(gateway: SharedGateway) -> Router {
    Router::new()
        .route(CHAT_PATH, post(chat))
        .with_state(gateway)
}

/// Serve until the listener fails
pub async fn serve(listener: TcpListener, gateway: SharedGateway) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, path = CHAT_PATH, "Chat gateway listening");
    axum::serve(listener, router(gateway)).await?;
    Ok(())
}

fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ChatFailure { error: error.into() })).into_response()
}

async fn chat(
    State(gateway): State<SharedGateway>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected chat body");
            return failure(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let turns = request.messages.len();
    match gateway.complete(request).await {
        Ok(message) => {
            tracing::info!(turns, reply_chars = message.chars().count(), "Chat reply generated");
            (StatusCode::OK, Json(ChatReply { message })).into_response()
        }
        Err(GatewayError::EmptyConversation) => {
            failure(StatusCode::BAD_REQUEST, GatewayError::EmptyConversation.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Upstream generation failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
    }
}
