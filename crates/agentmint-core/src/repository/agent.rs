//! Agent repository trait definition.

use agentmint_types::agent::{Agent, AgentId, AgentStatus};
use agentmint_types::error::RepositoryError;

use super::SortOrder;

/// Field an agent listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentSortField {
    #[default]
    CreatedAt,
    Name,
}

impl std::str::FromStr for AgentSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" | "createdAt" => Ok(AgentSortField::CreatedAt),
            "name" => Ok(AgentSortField::Name),
            other => Err(format!("invalid sort field: '{other}'")),
        }
    }
}

/// Filter criteria for listing agents.
#[derive(Debug, Clone, Default)]
pub struct AgentFilter {
    /// Filter by lifecycle status.
    pub status: Option<AgentStatus>,
    /// Field to sort by.
    pub sort_by: Option<AgentSortField>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip (offset pagination).
    pub offset: Option<i64>,
}

impl AgentFilter {
    /// Apply this filter to an in-memory list of agents.
    ///
    /// Shared by stores that hold the whole catalog in memory so they order
    /// and paginate exactly like the SQL backend does.
    pub fn apply(&self, agents: impl IntoIterator<Item = Agent>) -> Vec<Agent> {
        let mut out: Vec<Agent> = agents
            .into_iter()
            .filter(|a| self.status.is_none_or(|s| a.status == s))
            .collect();

        let order = self.sort_order.unwrap_or_default();
        match self.sort_by.unwrap_or_default() {
            AgentSortField::CreatedAt => out.sort_by(|a, b| {
                a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
            }),
            AgentSortField::Name => {
                out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)))
            }
        }
        if order == SortOrder::Desc {
            out.reverse();
        }

        let offset = self.offset.unwrap_or(0).max(0) as usize;
        let limit = self.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        out.into_iter().skip(offset).take(limit).collect()
    }
}

/// Repository trait for agent persistence.
///
/// Implementations live in agentmint-infra (e.g., `SqliteAgentRepository`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
///
/// Agents come back with their attached NFT (if any) populated; `update`
/// never touches the NFT, which is owned by [`super::nft::NftRepository`].
pub trait AgentRepository: Send + Sync {
    /// Create a new agent. Returns the created agent.
    fn create(
        &self,
        agent: &Agent,
    ) -> impl std::future::Future<Output = Result<Agent, RepositoryError>> + Send;

    /// Get an agent by its unique ID.
    fn get_by_id(
        &self,
        id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Option<Agent>, RepositoryError>> + Send;

    /// List agents with optional filtering, sorting, and pagination.
    fn list(
        &self,
        filter: Option<AgentFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Agent>, RepositoryError>> + Send;

    /// Update an existing agent's profile. Returns the stored agent.
    fn update(
        &self,
        agent: &Agent,
    ) -> impl std::future::Future<Output = Result<Agent, RepositoryError>> + Send;

    /// Permanently delete an agent along with its NFT and transactions.
    fn delete(
        &self,
        id: &AgentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
