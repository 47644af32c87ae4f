//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (agentmint-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod agent;
pub mod nft;

/// Sort order for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("invalid sort order: '{other}'")),
        }
    }
}
