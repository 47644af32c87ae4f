//! Agent CRUD handlers for the REST API.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;

use agentmint_core::agent::responder::ResponseGenerator;
use agentmint_types::agent::{
    Agent, AgentSummary, CreateAgentRequest, ReferenceDocument, UpdateAgentRequest,
};

use super::parse_agent_id;
use crate::http::error::AppError;
use crate::http::extractors::form::FormData;
use crate::http::extractors::json::JsonBody;
use crate::http::extractors::query::AgentListQuery;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

/// Body of a successful agent creation.
#[derive(Debug, Serialize)]
pub struct CreatedAgent {
    pub agent: Agent,
    pub initial_response: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedAgent {
    pub deleted: bool,
    pub id: String,
}

/// GET /api/v1/agents - List agents with filtering and sorting.
pub async fn list_agents(
    State(state): State<AppState>,
    Query(query): Query<AgentListQuery>,
) -> Result<Json<ApiResponse<Vec<AgentSummary>>>, AppError> {
    let ctx = RequestContext::start();
    let filter = query.into_filter()?;

    let agents = state.agent_service.list_agents(Some(filter)).await?;
    let summaries: Vec<AgentSummary> = agents.iter().map(AgentSummary::from).collect();

    Ok(Json(ctx.respond(summaries).with_link("self", "/api/v1/agents")))
}

/// POST /api/v1/agents - Create an agent from a multipart form.
///
/// Fields: `name` (or `agentName`), `role`, `tools` (JSON array of strings),
/// optional `file` (reference document), optional `creatorAddress`.
pub async fn create_agent(
    State(state): State<AppState>,
    form: FormData,
) -> Result<Json<ApiResponse<CreatedAgent>>, AppError> {
    let ctx = RequestContext::start();
    let request = create_request_from_form(&form)?;

    let agent = state.agent_service.create_agent(request).await?;
    let initial_response = ResponseGenerator::greeting(&agent);

    let id = agent.id;
    let resp = ctx
        .respond(CreatedAgent {
            agent,
            initial_response,
        })
        .with_link("self", &format!("/api/v1/agents/{id}"))
        .with_link("chat", &format!("/api/v1/agents/{id}/chat"));

    Ok(Json(resp))
}

fn create_request_from_form(form: &FormData) -> Result<CreateAgentRequest, AppError> {
    let tools = match form.text("tools") {
        Some(raw) => Some(serde_json::from_str::<Vec<String>>(raw).map_err(|e| {
            AppError::Validation(format!("tools must be a JSON array of strings: {e}"))
        })?),
        None => None,
    };

    let document = form.file("file").map(|file| ReferenceDocument {
        file_name: file.file_name.clone(),
        content: file.text(),
    });

    Ok(CreateAgentRequest {
        name: form
            .first_text(&["name", "agentName"])
            .unwrap_or_default()
            .to_string(),
        role: form.text("role").unwrap_or_default().to_string(),
        tools,
        document,
        creator_address: form.text("creatorAddress").map(str::to_string),
    })
}

/// GET /api/v1/agents/{id} - Get one agent, including its NFT.
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let ctx = RequestContext::start();
    let id = parse_agent_id(&id)?;

    let agent = state.agent_service.get_agent(&id).await?;

    Ok(Json(
        ctx.respond(agent)
            .with_link("self", &format!("/api/v1/agents/{id}"))
            .with_link("chat", &format!("/api/v1/agents/{id}/chat"))
            .with_link("transactions", &format!("/api/v1/agents/{id}/transactions")),
    ))
}

/// PUT /api/v1/agents/{id} - Update agent settings.
pub async fn update_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateAgentRequest>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let ctx = RequestContext::start();
    let id = parse_agent_id(&id)?;

    let updated = state.agent_service.update_agent(&id, body).await?;

    Ok(Json(
        ctx.respond(updated)
            .with_link("self", &format!("/api/v1/agents/{id}")),
    ))
}

/// DELETE /api/v1/agents/{id} - Delete an agent with its NFT, sales and chat.
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedAgent>>, AppError> {
    let ctx = RequestContext::start();
    let id = parse_agent_id(&id)?;

    state.agent_service.delete_agent(&id).await?;

    Ok(Json(ctx.respond(DeletedAgent {
        deleted: true,
        id: id.to_string(),
    })))
}
