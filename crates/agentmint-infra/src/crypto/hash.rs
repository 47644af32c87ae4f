//! SHA-256 content hashing.
//!
//! Implements the `ContentHasher` trait from `agentmint-core` using the
//! `sha2` crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};

use agentmint_core::service::hash::ContentHasher;

/// SHA-256 implementation of `ContentHasher`.
///
/// Produces lowercase hex digests; the ledger prefixes them with `0x` to
/// form a simulated transaction hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256ContentHasher;

impl ContentHasher for Sha256ContentHasher {
    fn compute_hash(&self, content: &str) -> String {
        let digest = Sha256::digest(content.as_bytes());
        format!("{:x}", digest)
    }
}
