//! Infrastructure layer for AgentMint.
//!
//! Contains implementations of the ports defined in `agentmint-core`:
//! JSON-file and SQLite storage, the in-memory chat log, the OpenAI
//! completion provider, SHA-256 hashing, and the simulated wallet gateway.

pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod json;
pub mod llm;
pub mod memory;
pub mod sqlite;
pub mod store;
pub mod wallet;
