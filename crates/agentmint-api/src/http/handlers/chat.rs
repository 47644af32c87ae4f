//! Chat handlers.
//!
//! Endpoints:
//! - GET  /api/v1/agents/{id}/chat - Full conversation, oldest first
//! - POST /api/v1/agents/{id}/chat - Send a message and get the reply
//! - DELETE /api/v1/agents/{id}/chat - Clear the conversation, keep the agent

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use agentmint_types::chat::{ChatExchange, ChatMessage};

use super::parse_agent_id;
use crate::http::error::AppError;
use crate::http::extractors::json::JsonBody;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ClearedHistory {
    pub cleared: bool,
}

/// GET /api/v1/agents/{id}/chat
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let ctx = RequestContext::start();
    let id = parse_agent_id(&id)?;

    // History alone can't tell an unknown agent from a silent one.
    state.agent_service.get_agent(&id).await?;
    let history = state.chat_service.get_history(&id).await?;

    Ok(Json(
        ctx.respond(history)
            .with_link("agent", &format!("/api/v1/agents/{id}")),
    ))
}

/// POST /api/v1/agents/{id}/chat
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ChatRequest>,
) -> Result<Json<ApiResponse<ChatExchange>>, AppError> {
    let ctx = RequestContext::start();
    let id = parse_agent_id(&id)?;

    let exchange = state.chat_service.send(&id, &body.message).await?;
    tracing::debug!(agent_id = %id, history_len = exchange.history.len(), "chat turn complete");

    Ok(Json(
        ctx.respond(exchange)
            .with_link("agent", &format!("/api/v1/agents/{id}")),
    ))
}

/// DELETE /api/v1/agents/{id}/chat
pub async fn clear_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ClearedHistory>>, AppError> {
    let ctx = RequestContext::start();
    let id = parse_agent_id(&id)?;

    state.agent_service.get_agent(&id).await?;
    state.chat_service.clear_history(&id).await?;

    Ok(Json(ctx.respond(ClearedHistory { cleared: true })))
}
