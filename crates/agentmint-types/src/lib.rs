//! Shared domain types for AgentMint.
//!
//! This crate contains the core domain types used across the AgentMint service:
//! Agent, ChatMessage, Nft, Transaction, completion request/response shapes,
//! global configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror,
//! rust_decimal.

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod nft;
