//! ContentHasher trait for computing integrity hashes.
//!
//! Defined in agentmint-core so the ledger can derive transaction hashes
//! without coupling to a specific algorithm. The `Sha256ContentHasher`
//! adapter lives in agentmint-infra.

/// Abstraction over content hashing.
///
/// Used by `NftLedger` to stamp each purchase with a simulated
/// transaction hash.
pub trait ContentHasher: Send + Sync {
    /// Compute a hex-encoded hash of the given content.
    fn compute_hash(&self, content: &str) -> String;
}
