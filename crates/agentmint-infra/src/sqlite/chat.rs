//! SQLite chat log implementation.
//!
//! Messages are ordered by an autoincrement `seq` column, so the order of
//! writes through the single writer connection is the conversation order.

use agentmint_core::chat::repository::ChatRepository;
use agentmint_types::agent::AgentId;
use agentmint_types::chat::{ChatMessage, MessageRole};
use agentmint_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

#[derive(Clone)]
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MessageRow {
    id: String,
    agent_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        Ok(ChatMessage {
            id: self
                .id
                .parse()
                .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?,
            agent_id: self
                .agent_id
                .parse()
                .map_err(|e| RepositoryError::Query(format!("invalid agent id: {e}")))?,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ChatRepository for SqliteChatRepository {
    async fn append(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO chat_messages (id, agent_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(message.agent_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn get_messages(
        &self,
        agent_id: &AgentId,
        last: Option<usize>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = match last {
            // Newest N, flipped back to oldest-first below.
            Some(n) => {
                sqlx::query(
                    "SELECT * FROM chat_messages WHERE agent_id = ? ORDER BY seq DESC LIMIT ?",
                )
                .bind(agent_id.to_string())
                .bind(i64::try_from(n).unwrap_or(i64::MAX))
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM chat_messages WHERE agent_id = ? ORDER BY seq ASC")
                    .bind(agent_id.to_string())
                    .fetch_all(&self.pool.reader)
                    .await
            }
        }
        .map_err(query_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = MessageRow::from_row(row).map_err(query_error)?;
            messages.push(msg_row.into_message()?);
        }
        if last.is_some() {
            messages.reverse();
        }
        Ok(messages)
    }

    async fn delete_messages(&self, agent_id: &AgentId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM chat_messages WHERE agent_id = ?")
            .bind(agent_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(())
    }
}
