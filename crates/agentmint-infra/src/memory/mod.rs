//! Process-local stores.

pub mod chat;
