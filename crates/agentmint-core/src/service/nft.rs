//! NFT ledger service.
//!
//! Validates mint and purchase requests, then hands the atomic part of each
//! operation to the `NftRepository`.

use agentmint_types::agent::AgentId;
use agentmint_types::error::{NftError, RepositoryError};
use agentmint_types::nft::{
    CreateNftRequest, Nft, NftId, PurchaseOrder, PurchaseReceipt, Transaction,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::repository::agent::AgentRepository;
use crate::repository::nft::NftRepository;
use crate::service::hash::ContentHasher;
use crate::service::id::IdGenerator;

/// Mints agent NFTs and records their sales.
pub struct NftLedger<N: NftRepository, A: AgentRepository, H: ContentHasher, I: IdGenerator> {
    nft_repo: N,
    agent_repo: A,
    hasher: H,
    ids: I,
}

impl<N: NftRepository, A: AgentRepository, H: ContentHasher, I: IdGenerator>
    NftLedger<N, A, H, I>
{
    pub fn new(nft_repo: N, agent_repo: A, hasher: H, ids: I) -> Self {
        Self {
            nft_repo,
            agent_repo,
            hasher,
            ids,
        }
    }

    /// Attach a freshly minted NFT to an agent.
    pub async fn attach_nft(
        &self,
        agent_id: &AgentId,
        request: CreateNftRequest,
    ) -> Result<Nft, NftError> {
        let supply = validate_create(&request)?;

        let agent = self
            .agent_repo
            .get_by_id(agent_id)
            .await
            .map_err(storage)?
            .ok_or(NftError::AgentNotFound)?;
        if agent.nft.is_some() {
            return Err(NftError::AlreadyMinted);
        }

        let nft = Nft {
            id: NftId(self.ids.next_id()),
            name: request.name.trim().to_string(),
            description: request.description.trim().to_string(),
            image: request.image.trim().to_string(),
            supply,
            price: request.price,
            creator_address: request.creator_address.trim().to_string(),
            created_at: Utc::now(),
            last_sale: None,
        };

        let nft = self
            .nft_repo
            .attach(agent_id, &nft)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => NftError::AgentNotFound,
                RepositoryError::Conflict(_) => NftError::AlreadyMinted,
                other => storage(other),
            })?;

        info!(agent_id = %agent_id, nft_id = %nft.id, supply = nft.supply, price = %nft.price, "NFT minted");
        Ok(nft)
    }

    /// Sell one unit of an agent's NFT to `buyer_address`.
    pub async fn purchase(
        &self,
        agent_id: &AgentId,
        buyer_address: &str,
    ) -> Result<PurchaseReceipt, NftError> {
        let buyer = buyer_address.trim();
        if buyer.is_empty() {
            return Err(NftError::Validation("buyer address is required".to_string()));
        }

        let agent = self
            .agent_repo
            .get_by_id(agent_id)
            .await
            .map_err(storage)?
            .ok_or(NftError::AgentNotFound)?;
        if agent.nft.is_none() {
            return Err(NftError::NftNotFound);
        }

        let transaction_id = self.ids.next_id();
        let timestamp = Utc::now();
        let transaction_hash = self.hasher.compute_hash(&format!(
            "{transaction_id}:{agent_id}:{buyer}:{}",
            timestamp.to_rfc3339()
        ));
        let order = PurchaseOrder {
            transaction_id,
            agent_id: *agent_id,
            buyer_address: buyer.to_string(),
            timestamp,
            transaction_hash: Some(format!("0x{transaction_hash}")),
        };

        let receipt = self
            .nft_repo
            .record_purchase(&order)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => NftError::NftNotFound,
                RepositoryError::OutOfStock => NftError::OutOfStock,
                other => storage(other),
            })?;

        info!(
            agent_id = %agent_id,
            transaction_id = %receipt.transaction.id,
            buyer = %buyer,
            remaining = receipt.nft.supply,
            "NFT purchased"
        );
        Ok(receipt)
    }

    /// Transactions for one agent, newest first.
    pub async fn transactions_for_agent(
        &self,
        agent_id: &AgentId,
    ) -> Result<Vec<Transaction>, NftError> {
        self.agent_repo
            .get_by_id(agent_id)
            .await
            .map_err(storage)?
            .ok_or(NftError::AgentNotFound)?;

        self.nft_repo
            .transactions_for_agent(agent_id)
            .await
            .map_err(storage)
    }

    /// Transactions made by a buyer address, newest first.
    pub async fn transactions_for_buyer(
        &self,
        buyer_address: &str,
    ) -> Result<Vec<Transaction>, NftError> {
        let buyer = buyer_address.trim();
        if buyer.is_empty() {
            return Err(NftError::Validation("buyer address is required".to_string()));
        }
        self.nft_repo
            .transactions_for_buyer(buyer)
            .await
            .map_err(storage)
    }
}

fn storage(e: RepositoryError) -> NftError {
    NftError::Storage(e.to_string())
}

fn validate_create(request: &CreateNftRequest) -> Result<u32, NftError> {
    for (field, value) in [
        ("name", &request.name),
        ("description", &request.description),
        ("image", &request.image),
        ("creator address", &request.creator_address),
    ] {
        if value.trim().is_empty() {
            return Err(NftError::Validation(format!("{field} is required")));
        }
    }
    if request.supply < 1 {
        return Err(NftError::Validation("supply must be at least 1".to_string()));
    }
    if request.price < Decimal::ZERO {
        return Err(NftError::Validation("price must not be negative".to_string()));
    }
    u32::try_from(request.supply)
        .map_err(|_| NftError::Validation(format!("supply must not exceed {}", u32::MAX)))
}
