//! Per-agent conversation history.
//!
//! - `ChatRepository`: append-only message storage, one log per agent
//! - `ChatService`: validates turns and drives the response generator

pub mod repository;
pub mod service;
