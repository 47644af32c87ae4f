//! Cryptographic helpers for AgentMint.
//!
//! - `hash`: SHA-256 digests for simulated transaction hashes

pub mod hash;
