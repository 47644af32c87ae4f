//! NFT and purchase transaction types.
//!
//! NFTs are simulated: a limited-supply record attached to one agent. No
//! on-chain settlement happens; a purchase only decrements supply and appends
//! a [`Transaction`] to the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentId;

/// Seller address recorded when an NFT has no known creator.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Unique identifier for an NFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NftId(pub Uuid);

impl NftId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for NftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NftId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A limited-supply token attached to an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nft {
    pub id: NftId,
    pub name: String,
    pub description: String,
    /// Data URL or external image URL.
    pub image: String,
    /// Remaining supply. Decremented on each purchase, never increased.
    pub supply: u32,
    /// Unit price, never negative.
    pub price: Decimal,
    pub creator_address: String,
    pub created_at: DateTime<Utc>,
    /// Snapshot of the most recent sale only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sale: Option<LastSale>,
}

impl Nft {
    /// Whether at least one unit can still be purchased.
    pub fn in_stock(&self) -> bool {
        self.supply > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastSale {
    pub buyer: String,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// An append-only ledger entry, one per successful purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub agent_id: AgentId,
    pub nft_id: NftId,
    pub buyer_address: String,
    pub seller_address: String,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    /// Simulated settlement hash (hex SHA-256 over the sale fields).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

/// Request to mint an NFT for an agent.
///
/// `supply` is signed so that negative input reaches validation instead of
/// failing at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNftRequest {
    pub name: String,
    pub description: String,
    pub image: String,
    pub supply: i64,
    pub price: Decimal,
    pub creator_address: String,
}

/// Everything the ledger needs to record one purchase.
///
/// Built by the NFT service; the store applies it atomically against the
/// current supply and fills in price and seller from the stored NFT.
#[derive(Debug, Clone)]
pub struct PurchaseOrder {
    pub transaction_id: Uuid,
    pub agent_id: AgentId,
    pub buyer_address: String,
    pub timestamp: DateTime<Utc>,
    pub transaction_hash: Option<String>,
}

/// Result of a successful purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub nft: Nft,
    pub transaction: Transaction,
}
