use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::nft::Nft;

/// Tool enabled on every agent created without an explicit tool list.
pub const DEFAULT_TOOL: &str = "web_search";

/// Unique identifier for an agent, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Create a new AgentId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create an AgentId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AgentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A reference document uploaded alongside an agent.
///
/// The content is fed (truncated) into the agent's system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub file_name: String,
    pub content: String,
}

/// An AI agent persona.
///
/// Agents own their chat history and at most one NFT. Deleting an agent
/// removes both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Display name (duplicates allowed).
    pub name: String,
    /// Free-text role description used to build the system prompt.
    pub role: String,
    /// Enabled tool identifiers. Descriptive labels only, never executed.
    pub tools: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<ReferenceDocument>,
    pub status: AgentStatus,
    /// Wallet address of whoever created the agent, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft: Option<Nft>,
}

/// Agent lifecycle states.
///
/// Only `Active` agents can chat. Status does not affect listing or NFT
/// sales; use the status filter to narrow a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Active,
    Disabled,
    Archived,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Active => write!(f, "active"),
            AgentStatus::Disabled => write!(f, "disabled"),
            AgentStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for AgentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(AgentStatus::Active),
            "disabled" => Ok(AgentStatus::Disabled),
            "archived" => Ok(AgentStatus::Archived),
            other => Err(format!("invalid agent status: '{other}'")),
        }
    }
}

/// Compact listing view of an agent (no document content, no tools).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: AgentId,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub status: AgentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft: Option<Nft>,
}

impl From<&Agent> for AgentSummary {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name.clone(),
            role: agent.role.clone(),
            created_at: agent.created_at,
            status: agent.status,
            nft: agent.nft.clone(),
        }
    }
}

/// Request to create a new agent. `name` and `role` are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub role: String,
    /// Defaults to [`DEFAULT_TOOL`] when absent.
    pub tools: Option<Vec<String>>,
    pub document: Option<ReferenceDocument>,
    pub creator_address: Option<String>,
}

/// Settings update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub tools: Option<Vec<String>>,
    pub document: Option<ReferenceDocument>,
    /// Detach the current reference document. Ignored when `document` is set.
    #[serde(default)]
    pub remove_document: bool,
    pub status: Option<AgentStatus>,
}

/// Normalize a tool list into a set: trimmed, empty entries dropped.
pub fn normalize_tools<I, S>(tools: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tools
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
