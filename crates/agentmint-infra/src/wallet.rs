//! Simulated wallet gateway.
//!
//! Trusts the client's `connected` flag and only checks that the address has
//! the shape of an Ethereum account. Swap in a signature-verifying gateway to
//! authenticate wallets for real.

use agentmint_core::wallet::WalletGateway;
use agentmint_types::error::WalletError;

#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedWalletGateway;

impl WalletGateway for SimulatedWalletGateway {
    fn verify(&self, address: &str, connected: bool) -> Result<String, WalletError> {
        if !connected {
            return Err(WalletError::NotConnected);
        }

        let address = address.trim();
        let valid = address.len() == 42
            && (address.starts_with("0x") || address.starts_with("0X"))
            && address[2..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(WalletError::InvalidAddress(address.to_string()));
        }

        Ok(format!("0x{}", address[2..].to_ascii_lowercase()))
    }
}
