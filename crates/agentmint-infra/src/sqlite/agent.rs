//! SQLite agent repository implementation.
//!
//! Implements `AgentRepository` from `agentmint-core` using sqlx with split
//! read/write pools. Agents are read with their NFT via a `LEFT JOIN`.

use agentmint_core::repository::SortOrder;
use agentmint_core::repository::agent::{AgentFilter, AgentRepository, AgentSortField};
use agentmint_types::agent::{Agent, AgentId, AgentStatus, ReferenceDocument};
use agentmint_types::error::RepositoryError;
use sqlx::Row;

use super::nft::{NFT_COLUMNS, NftRow};
use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `AgentRepository`.
#[derive(Clone)]
pub struct SqliteAgentRepository {
    pool: DatabasePool,
}

impl SqliteAgentRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn select_sql() -> String {
        format!("SELECT a.*, {NFT_COLUMNS} FROM agents a LEFT JOIN nfts n ON n.agent_id = a.id")
    }
}

/// Internal row type for mapping SQLite rows to domain Agent.
struct AgentRow {
    id: String,
    name: String,
    role: String,
    tools: String,
    document_name: Option<String>,
    document_content: Option<String>,
    status: String,
    creator_address: Option<String>,
    created_at: String,
    updated_at: String,
    nft: Option<NftRow>,
}

impl AgentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            role: row.try_get("role")?,
            tools: row.try_get("tools")?,
            document_name: row.try_get("document_name")?,
            document_content: row.try_get("document_content")?,
            status: row.try_get("status")?,
            creator_address: row.try_get("creator_address")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            nft: NftRow::from_row(row)?,
        })
    }

    fn into_agent(self) -> Result<Agent, RepositoryError> {
        let id = self
            .id
            .parse::<AgentId>()
            .map_err(|e| RepositoryError::Query(format!("invalid agent id: {e}")))?;

        let status: AgentStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        let tools = serde_json::from_str(&self.tools)
            .map_err(|e| RepositoryError::Query(format!("invalid tools JSON: {e}")))?;

        let document = match (self.document_name, self.document_content) {
            (Some(file_name), Some(content)) => Some(ReferenceDocument { file_name, content }),
            _ => None,
        };

        Ok(Agent {
            id,
            name: self.name,
            role: self.role,
            tools,
            document,
            status,
            creator_address: self.creator_address,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            nft: self.nft.map(NftRow::into_nft).transpose()?,
        })
    }
}

impl AgentRepository for SqliteAgentRepository {
    async fn create(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let tools_json =
            serde_json::to_string(&agent.tools).map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO agents (id, name, role, tools, document_name, document_content, status, creator_address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(agent.id.to_string())
        .bind(&agent.name)
        .bind(&agent.role)
        .bind(&tools_json)
        .bind(agent.document.as_ref().map(|d| d.file_name.as_str()))
        .bind(agent.document.as_ref().map(|d| d.content.as_str()))
        .bind(agent.status.to_string())
        .bind(&agent.creator_address)
        .bind(format_datetime(&agent.created_at))
        .bind(format_datetime(&agent.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(agent.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("agent '{}' already exists", agent.id)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE a.id = ?", Self::select_sql()))
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let agent_row = AgentRow::from_row(&row).map_err(query_error)?;
                Ok(Some(agent_row.into_agent()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, filter: Option<AgentFilter>) -> Result<Vec<Agent>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut sql = Self::select_sql();

        if filter.status.is_some() {
            sql.push_str(" WHERE a.status = ?");
        }

        let sort_field = match filter.sort_by.unwrap_or_default() {
            AgentSortField::CreatedAt => "a.created_at",
            AgentSortField::Name => "a.name",
        };
        let order = match filter.sort_order.unwrap_or_default() {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY {sort_field} {order}, a.id {order}"));

        // SQLite requires LIMIT whenever OFFSET is present; -1 means no limit.
        if filter.limit.is_some() || filter.offset.is_some() {
            let limit = filter.limit.map(|l| l.max(0)).unwrap_or(-1);
            let offset = filter.offset.unwrap_or(0).max(0);
            sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        }

        let mut query = sqlx::query(&sql);
        if let Some(status) = filter.status {
            query = query.bind(status.to_string());
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut agents = Vec::with_capacity(rows.len());
        for row in &rows {
            let agent_row = AgentRow::from_row(row).map_err(query_error)?;
            agents.push(agent_row.into_agent()?);
        }

        Ok(agents)
    }

    async fn update(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let tools_json =
            serde_json::to_string(&agent.tools).map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE agents SET name = ?, role = ?, tools = ?, document_name = ?, document_content = ?, status = ?, creator_address = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&agent.name)
        .bind(&agent.role)
        .bind(&tools_json)
        .bind(agent.document.as_ref().map(|d| d.file_name.as_str()))
        .bind(agent.document.as_ref().map(|d| d.content.as_str()))
        .bind(agent.status.to_string())
        .bind(&agent.creator_address)
        .bind(format_datetime(&agent.updated_at))
        .bind(agent.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        // Re-read so the caller sees the stored NFT, not whatever it passed in.
        self.get_by_id(&agent.id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
