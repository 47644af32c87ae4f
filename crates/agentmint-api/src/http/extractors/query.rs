//! Query parameter extractors for list endpoints.

use agentmint_core::repository::SortOrder;
use agentmint_core::repository::agent::{AgentFilter, AgentSortField};
use agentmint_types::agent::AgentStatus;
use serde::Deserialize;

use crate::http::error::AppError;

/// Query parameters for the agent list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct AgentListQuery {
    /// Filter by status (active, disabled, archived).
    pub status: Option<String>,
    /// `created_at` (default) or `name`.
    pub sort: Option<String>,
    /// `asc` or `desc` (default).
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AgentListQuery {
    pub fn into_filter(self) -> Result<AgentFilter, AppError> {
        let status = self
            .status
            .map(|s| s.parse::<AgentStatus>())
            .transpose()
            .map_err(AppError::Validation)?;
        let sort_by = self
            .sort
            .map(|s| s.parse::<AgentSortField>())
            .transpose()
            .map_err(AppError::Validation)?;
        let sort_order = self
            .order
            .map(|s| s.parse::<SortOrder>())
            .transpose()
            .map_err(AppError::Validation)?;

        if matches!(self.limit, Some(l) if l < 0) || matches!(self.offset, Some(o) if o < 0) {
            return Err(AppError::Validation(
                "limit and offset must not be negative".to_string(),
            ));
        }

        Ok(AgentFilter {
            status,
            sort_by,
            sort_order,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// Query parameters for the buyer transaction lookup.
#[derive(Debug, Deserialize)]
pub struct BuyerQuery {
    #[serde(default)]
    pub buyer: String,
}
