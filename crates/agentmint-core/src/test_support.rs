//! In-memory repository doubles for service tests.

use std::collections::HashMap;
use std::sync::Arc;

use agentmint_types::agent::{Agent, AgentId};
use agentmint_types::chat::ChatMessage;
use agentmint_types::error::RepositoryError;
use agentmint_types::nft::{
    LastSale, Nft, PurchaseOrder, PurchaseReceipt, Transaction, ZERO_ADDRESS,
};
use tokio::sync::Mutex;

use crate::chat::repository::ChatRepository;
use crate::repository::agent::{AgentFilter, AgentRepository};
use crate::repository::nft::NftRepository;
use crate::service::hash::ContentHasher;

#[derive(Default)]
struct LedgerState {
    agents: HashMap<AgentId, Agent>,
    transactions: Vec<Transaction>,
}

/// Agents, NFTs and transactions behind one lock.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl AgentRepository for MemoryLedger {
    async fn create(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let mut state = self.state.lock().await;
        state.agents.insert(agent.id, agent.clone());
        Ok(agent.clone())
    }

    async fn get_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.state.lock().await.agents.get(id).cloned())
    }

    async fn list(&self, filter: Option<AgentFilter>) -> Result<Vec<Agent>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(filter.unwrap_or_default().apply(state.agents.values().cloned()))
    }

    async fn update(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let mut state = self.state.lock().await;
        let stored = state.agents.get_mut(&agent.id).ok_or(RepositoryError::NotFound)?;
        let nft = stored.nft.take();
        *stored = Agent {
            nft,
            ..agent.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        state.agents.remove(id);
        state.transactions.retain(|t| t.agent_id != *id);
        Ok(())
    }
}

impl NftRepository for MemoryLedger {
    async fn attach(&self, agent_id: &AgentId, nft: &Nft) -> Result<Nft, RepositoryError> {
        let mut state = self.state.lock().await;
        let agent = state.agents.get_mut(agent_id).ok_or(RepositoryError::NotFound)?;
        if agent.nft.is_some() {
            return Err(RepositoryError::Conflict("agent already has an NFT".to_string()));
        }
        agent.nft = Some(nft.clone());
        Ok(nft.clone())
    }

    async fn record_purchase(
        &self,
        order: &PurchaseOrder,
    ) -> Result<PurchaseReceipt, RepositoryError> {
        let mut state = self.state.lock().await;
        let nft = state
            .agents
            .get_mut(&order.agent_id)
            .and_then(|a| a.nft.as_mut())
            .ok_or(RepositoryError::NotFound)?;
        if nft.supply == 0 {
            return Err(RepositoryError::OutOfStock);
        }
        nft.supply -= 1;
        nft.last_sale = Some(LastSale {
            buyer: order.buyer_address.clone(),
            price: nft.price,
            timestamp: order.timestamp,
        });
        let nft = nft.clone();
        let seller = if nft.creator_address.is_empty() {
            ZERO_ADDRESS.to_string()
        } else {
            nft.creator_address.clone()
        };
        let transaction = Transaction {
            id: order.transaction_id,
            agent_id: order.agent_id,
            nft_id: nft.id,
            buyer_address: order.buyer_address.clone(),
            seller_address: seller,
            price: nft.price,
            timestamp: order.timestamp,
            transaction_hash: order.transaction_hash.clone(),
        };
        state.transactions.push(transaction.clone());
        Ok(PurchaseReceipt { nft, transaction })
    }

    async fn transactions_for_agent(
        &self,
        agent_id: &AgentId,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .rev()
            .filter(|t| t.agent_id == *agent_id)
            .cloned()
            .collect())
    }

    async fn transactions_for_buyer(
        &self,
        buyer_address: &str,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .rev()
            .filter(|t| t.buyer_address.eq_ignore_ascii_case(buyer_address))
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MemoryChat {
    logs: Arc<Mutex<HashMap<AgentId, Vec<ChatMessage>>>>,
}

impl ChatRepository for MemoryChat {
    async fn append(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        self.logs
            .lock()
            .await
            .entry(message.agent_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn get_messages(
        &self,
        agent_id: &AgentId,
        last: Option<usize>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let logs = self.logs.lock().await;
        let log = logs.get(agent_id).map(Vec::as_slice).unwrap_or_default();
        let skip = last.map(|n| log.len().saturating_sub(n)).unwrap_or(0);
        Ok(log[skip..].to_vec())
    }

    async fn delete_messages(&self, agent_id: &AgentId) -> Result<(), RepositoryError> {
        self.logs.lock().await.remove(agent_id);
        Ok(())
    }
}

/// Deterministic stand-in for a real digest.
pub struct PrefixHasher;

impl ContentHasher for PrefixHasher {
    fn compute_hash(&self, content: &str) -> String {
        format!("{:016x}", content.len())
    }
}
