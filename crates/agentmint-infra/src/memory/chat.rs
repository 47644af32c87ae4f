//! In-memory chat log backed by `dashmap`.
//!
//! Each agent's log sits behind its own shard entry, so appends for one agent
//! are serialized while different agents proceed in parallel. History is lost
//! on restart.

use std::sync::Arc;

use agentmint_core::chat::repository::ChatRepository;
use agentmint_types::agent::AgentId;
use agentmint_types::chat::ChatMessage;
use agentmint_types::error::RepositoryError;
use dashmap::DashMap;

#[derive(Clone, Default)]
pub struct MemoryChatRepository {
    logs: Arc<DashMap<AgentId, Vec<ChatMessage>>>,
}

impl MemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatRepository for MemoryChatRepository {
    async fn append(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        self.logs
            .entry(message.agent_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn get_messages(
        &self,
        agent_id: &AgentId,
        last: Option<usize>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let Some(log) = self.logs.get(agent_id) else {
            return Ok(Vec::new());
        };
        let skip = last.map(|n| log.len().saturating_sub(n)).unwrap_or(0);
        Ok(log[skip..].to_vec())
    }

    async fn delete_messages(&self, agent_id: &AgentId) -> Result<(), RepositoryError> {
        self.logs.remove(agent_id);
        Ok(())
    }
}
