//! Chat service orchestrating per-agent conversations.
//!
//! ChatService coordinates the ChatRepository, the AgentRepository, and the
//! ResponseGenerator: it validates a user turn, feeds the bounded window of
//! earlier messages to the generator, and records both sides of the turn.

use agentmint_types::agent::{AgentId, AgentStatus};
use agentmint_types::chat::{ChatExchange, ChatMessage, MessageRole};
use agentmint_types::error::ChatError;
use tracing::{debug, info};

use crate::agent::responder::ResponseGenerator;
use crate::chat::repository::ChatRepository;
use crate::repository::agent::AgentRepository;

/// Orchestrates chat history and reply generation.
pub struct ChatService<C: ChatRepository, A: AgentRepository> {
    chat_repo: C,
    agent_repo: A,
    generator: ResponseGenerator,
    history_window: usize,
}

impl<C: ChatRepository, A: AgentRepository> ChatService<C, A> {
    /// - `history_window`: how many earlier messages the generator sees
    pub fn new(
        chat_repo: C,
        agent_repo: A,
        generator: ResponseGenerator,
        history_window: usize,
    ) -> Self {
        Self {
            chat_repo,
            agent_repo,
            generator,
            history_window,
        }
    }

    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    /// Append a user message. Returns the updated history.
    pub async fn append_user_message(
        &self,
        agent_id: &AgentId,
        text: &str,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        self.append(agent_id, MessageRole::User, text).await
    }

    /// Append an assistant message. Returns the updated history.
    pub async fn append_assistant_message(
        &self,
        agent_id: &AgentId,
        text: &str,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        self.append(agent_id, MessageRole::Assistant, text).await
    }

    /// Full history in insertion order. Empty for an agent that has not chatted.
    pub async fn get_history(&self, agent_id: &AgentId) -> Result<Vec<ChatMessage>, ChatError> {
        self.chat_repo
            .get_messages(agent_id, None)
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))
    }

    /// The most recent `history_window` messages, oldest first.
    pub async fn recent_window(&self, agent_id: &AgentId) -> Result<Vec<ChatMessage>, ChatError> {
        self.chat_repo
            .get_messages(agent_id, Some(self.history_window))
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))
    }

    pub async fn clear_history(&self, agent_id: &AgentId) -> Result<(), ChatError> {
        self.chat_repo
            .delete_messages(agent_id)
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))
    }

    /// Run one chat turn: record the user message, generate and record the reply.
    ///
    /// The generator sees the window of messages that existed *before* this
    /// turn, followed by the new user message. If the agent is deleted while
    /// the reply is generated, the reply is dropped with `AgentNotFound`.
    pub async fn send(&self, agent_id: &AgentId, text: &str) -> Result<ChatExchange, ChatError> {
        let text = validate_text(text)?;
        let agent = self
            .agent_repo
            .get_by_id(agent_id)
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?
            .ok_or(ChatError::AgentNotFound)?;
        if agent.status != AgentStatus::Active {
            return Err(ChatError::Validation(format!(
                "agent is {} and cannot chat",
                agent.status
            )));
        }

        let prior = self.recent_window(agent_id).await?;
        self.save(ChatMessage::new(*agent_id, MessageRole::User, text))
            .await?;

        let reply = self.generator.generate(&agent, &prior, text).await;

        // The agent may have been deleted while the reply was generated.
        if let Err(e) = self.require_agent(agent_id).await {
            self.clear_history(agent_id).await?;
            debug!(agent_id = %agent_id, "agent removed during generation, reply discarded");
            return Err(e);
        }
        self.save(ChatMessage::new(*agent_id, MessageRole::Assistant, reply.clone()))
            .await?;

        info!(agent_id = %agent_id, context_messages = prior.len(), "chat turn completed");

        let history = self.get_history(agent_id).await?;
        Ok(ChatExchange { reply, history })
    }

    async fn append(
        &self,
        agent_id: &AgentId,
        role: MessageRole,
        text: &str,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let text = validate_text(text)?;
        self.require_agent(agent_id).await?;
        self.save(ChatMessage::new(*agent_id, role, text)).await?;
        self.get_history(agent_id).await
    }

    async fn save(&self, message: ChatMessage) -> Result<(), ChatError> {
        debug!(agent_id = %message.agent_id, role = %message.role, "saving chat message");
        self.chat_repo
            .append(&message)
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))
    }

    async fn require_agent(&self, agent_id: &AgentId) -> Result<(), ChatError> {
        self.agent_repo
            .get_by_id(agent_id)
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?
            .map(|_| ())
            .ok_or(ChatError::AgentNotFound)
    }
}

fn validate_text(text: &str) -> Result<&str, ChatError> {
    if text.trim().is_empty() {
        return Err(ChatError::Validation("message must not be empty".to_string()));
    }
    Ok(text)
}
