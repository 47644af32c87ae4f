//! HTTP request handlers for the REST API.

pub mod agent;
pub mod chat;
pub mod nft;
pub mod system;

use agentmint_types::agent::AgentId;
use agentmint_types::error::AgentError;

use crate::http::error::AppError;

/// Parse an agent id path segment. A malformed id cannot name an agent.
pub(crate) fn parse_agent_id(raw: &str) -> Result<AgentId, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Agent(AgentError::NotFound))
}
