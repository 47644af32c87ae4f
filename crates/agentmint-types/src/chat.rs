//! Chat message types for AgentMint.
//!
//! Each agent owns one append-only conversation. Insertion order is the
//! conversation order and is the only context fed back to the generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentId;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// A single message in an agent's conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub agent_id: AgentId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a message stamped with the current server time.
    pub fn new(agent_id: AgentId, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            agent_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Outcome of one user turn: the assistant reply plus the full history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    pub reply: String,
    pub history: Vec<ChatMessage>,
}
