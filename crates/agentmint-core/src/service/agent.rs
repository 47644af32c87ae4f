//! Agent management service.
//!
//! Orchestrates agent creation, settings updates, and deletion. Deleting an
//! agent removes its NFT, transactions, and chat history.

use agentmint_types::agent::{
    Agent, AgentId, AgentStatus, CreateAgentRequest, DEFAULT_TOOL, UpdateAgentRequest,
    normalize_tools,
};
use agentmint_types::error::AgentError;
use tracing::info;

use crate::chat::repository::ChatRepository;
use crate::repository::agent::{AgentFilter, AgentRepository};
use crate::service::id::IdGenerator;

/// Service orchestrating the agent lifecycle.
pub struct AgentService<A: AgentRepository, C: ChatRepository, I: IdGenerator> {
    agent_repo: A,
    chat_repo: C,
    ids: I,
}

impl<A: AgentRepository, C: ChatRepository, I: IdGenerator> AgentService<A, C, I> {
    pub fn new(agent_repo: A, chat_repo: C, ids: I) -> Self {
        Self {
            agent_repo,
            chat_repo,
            ids,
        }
    }

    /// Create a new active agent.
    ///
    /// Name and role are required. Tools default to `web_search` when the
    /// request carries none.
    pub async fn create_agent(&self, request: CreateAgentRequest) -> Result<Agent, AgentError> {
        let name = required("name", &request.name)?;
        let role = required("role", &request.role)?;
        let tools = match request.tools {
            Some(tools) => normalize_tools(tools),
            None => normalize_tools([DEFAULT_TOOL]),
        };

        let now = chrono::Utc::now();
        let agent = Agent {
            id: AgentId::from_uuid(self.ids.next_id()),
            name,
            role,
            tools,
            document: request.document,
            status: AgentStatus::Active,
            creator_address: request.creator_address,
            created_at: now,
            updated_at: now,
            nft: None,
        };

        let agent = self
            .agent_repo
            .create(&agent)
            .await
            .map_err(|e| AgentError::Storage(e.to_string()))?;

        info!(agent_id = %agent.id, name = %agent.name, "agent created");
        Ok(agent)
    }

    /// Get an agent by ID.
    pub async fn get_agent(&self, id: &AgentId) -> Result<Agent, AgentError> {
        self.agent_repo
            .get_by_id(id)
            .await
            .map_err(|e| AgentError::Storage(e.to_string()))?
            .ok_or(AgentError::NotFound)
    }

    /// List agents with optional filtering.
    pub async fn list_agents(&self, filter: Option<AgentFilter>) -> Result<Vec<Agent>, AgentError> {
        self.agent_repo
            .list(filter)
            .await
            .map_err(|e| AgentError::Storage(e.to_string()))
    }

    /// Update an agent's settings.
    pub async fn update_agent(
        &self,
        id: &AgentId,
        request: UpdateAgentRequest,
    ) -> Result<Agent, AgentError> {
        let mut agent = self.get_agent(id).await?;

        if let Some(name) = request.name {
            agent.name = required("name", &name)?;
        }
        if let Some(role) = request.role {
            agent.role = required("role", &role)?;
        }
        if let Some(tools) = request.tools {
            agent.tools = normalize_tools(tools);
        }
        if request.remove_document {
            agent.document = None;
        }
        if let Some(document) = request.document {
            agent.document = Some(document);
        }
        if let Some(status) = request.status {
            agent.status = status;
        }

        agent.updated_at = chrono::Utc::now();

        self.agent_repo
            .update(&agent)
            .await
            .map_err(|e| AgentError::Storage(e.to_string()))
    }

    /// Delete an agent, its NFT and transactions, and its chat history.
    pub async fn delete_agent(&self, id: &AgentId) -> Result<(), AgentError> {
        self.get_agent(id).await?;

        self.agent_repo
            .delete(id)
            .await
            .map_err(|e| AgentError::Storage(e.to_string()))?;

        self.chat_repo
            .delete_messages(id)
            .await
            .map_err(|e| AgentError::Storage(e.to_string()))?;

        info!(agent_id = %id, "agent deleted");
        Ok(())
    }
}

fn required(field: &str, value: &str) -> Result<String, AgentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AgentError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
