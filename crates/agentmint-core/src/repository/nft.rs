//! NFT ledger repository trait definition.

use agentmint_types::agent::AgentId;
use agentmint_types::error::RepositoryError;
use agentmint_types::nft::{Nft, PurchaseOrder, PurchaseReceipt, Transaction};

/// Repository trait for NFT and transaction persistence.
///
/// `record_purchase` is the one operation with a concurrency contract: the
/// stock check, the supply decrement, the last-sale update and the
/// transaction insert happen as a single atomic step. Two concurrent
/// purchases of the last unit must never both succeed.
pub trait NftRepository: Send + Sync {
    /// Attach an NFT to an agent.
    ///
    /// Fails with `NotFound` if the agent does not exist and `Conflict` if it
    /// already has an NFT.
    fn attach(
        &self,
        agent_id: &AgentId,
        nft: &Nft,
    ) -> impl std::future::Future<Output = Result<Nft, RepositoryError>> + Send;

    /// Atomically sell one unit of the agent's NFT.
    ///
    /// Price and seller are taken from the stored NFT at the moment of sale.
    /// Fails with `NotFound` if the agent has no NFT and `OutOfStock` if its
    /// supply is zero.
    fn record_purchase(
        &self,
        order: &PurchaseOrder,
    ) -> impl std::future::Future<Output = Result<PurchaseReceipt, RepositoryError>> + Send;

    /// Transactions for one agent, newest first.
    fn transactions_for_agent(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Vec<Transaction>, RepositoryError>> + Send;

    /// Transactions made by one buyer address (case-insensitive), newest first.
    fn transactions_for_buyer(
        &self,
        buyer_address: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Transaction>, RepositoryError>> + Send;
}
