//! ChatRepository trait definition.
//!
//! Follows the same RPITIT pattern as AgentRepository.

use agentmint_types::agent::AgentId;
use agentmint_types::chat::ChatMessage;
use agentmint_types::error::RepositoryError;

/// Repository trait for chat message persistence.
///
/// Implementations live in agentmint-infra (`MemoryChatRepository`,
/// `SqliteChatRepository`). Messages are returned in insertion order; an
/// agent with no history simply has an empty log.
pub trait ChatRepository: Send + Sync {
    /// Append a message to its agent's log.
    fn append(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get an agent's messages in insertion order.
    ///
    /// With `last = Some(n)` only the final `n` messages are returned, still
    /// oldest first.
    fn get_messages(
        &self,
        agent_id: &AgentId,
        last: Option<usize>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Drop an agent's entire log.
    fn delete_messages(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
