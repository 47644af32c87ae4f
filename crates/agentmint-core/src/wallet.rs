//! Wallet gateway port.
//!
//! The ledger only ever sees the normalized address a gateway returns; how a
//! wallet is authenticated is the gateway's business. The simulated
//! implementation lives in agentmint-infra.

use agentmint_types::error::WalletError;

pub trait WalletGateway: Send + Sync {
    /// Check that `address` belongs to a connected wallet and return it in
    /// canonical form.
    fn verify(&self, address: &str, connected: bool) -> Result<String, WalletError>;
}
