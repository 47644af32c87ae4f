//! Service layer for AgentMint business logic.
//!
//! Services are generic over repository traits so agentmint-core never
//! depends on agentmint-infra.

pub mod agent;
pub mod hash;
pub mod id;
pub mod nft;
