//! Business logic and repository trait definitions for AgentMint.
//!
//! This crate defines the "ports" (repository traits, completion provider,
//! wallet gateway) that the infrastructure layer implements. It depends only
//! on `agentmint-types` -- never on `agentmint-infra` or any database/IO crate.

pub mod agent;
pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;
