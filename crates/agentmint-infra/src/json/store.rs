//! JSON file implementation of `AgentRepository` and `NftRepository`.

use std::path::PathBuf;
use std::sync::Arc;

use agentmint_core::repository::agent::{AgentFilter, AgentRepository};
use agentmint_core::repository::nft::NftRepository;
use agentmint_types::agent::{Agent, AgentId};
use agentmint_types::error::RepositoryError;
use agentmint_types::nft::{
    LastSale, Nft, PurchaseOrder, PurchaseReceipt, Transaction, ZERO_ADDRESS,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::filesystem::write_atomic;

/// On-disk layout: `{ "agents": [ { ...agent, "nft": {...}, "transactions": [...] } ] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    agents: Vec<AgentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AgentRecord {
    #[serde(flatten)]
    agent: Agent,
    /// Oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    transactions: Vec<Transaction>,
}

impl Document {
    fn find(&self, id: &AgentId) -> Option<&AgentRecord> {
        self.agents.iter().find(|r| r.agent.id == *id)
    }

    fn find_mut(&mut self, id: &AgentId) -> Option<&mut AgentRecord> {
        self.agents.iter_mut().find(|r| r.agent.id == *id)
    }
}

struct Inner {
    /// `None` keeps everything in memory (tests).
    path: Option<PathBuf>,
    document: Mutex<Document>,
}

/// Agent catalog persisted as one JSON document.
///
/// Cloning is cheap and every clone shares the same document and lock.
#[derive(Clone)]
pub struct JsonAgentStore {
    inner: Arc<Inner>,
}

impl JsonAgentStore {
    /// Load the document at `path`, starting empty if the file does not exist.
    ///
    /// A file that exists but does not parse is an error rather than being
    /// silently replaced.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Document>(&bytes).map_err(|e| {
                RepositoryError::Query(format!("failed to parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no store at {}, starting empty", path.display());
                Document::default()
            }
            Err(e) => {
                return Err(RepositoryError::Query(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        info!(path = %path.display(), agents = document.agents.len(), "JSON store opened");
        Ok(Self {
            inner: Arc::new(Inner {
                path: Some(path),
                document: Mutex::new(document),
            }),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                path: None,
                document: Mutex::new(Document::default()),
            }),
        }
    }

    /// Write the current document to disk one last time.
    pub async fn close(&self) -> Result<(), RepositoryError> {
        let document = self.inner.document.lock().await;
        self.flush(&document).await
    }

    async fn flush(&self, document: &Document) -> Result<(), RepositoryError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize store: {e}")))?;
        write_atomic(path, &bytes)
            .await
            .map_err(|e| RepositoryError::Query(format!("failed to write {}: {e}", path.display())))
    }

    /// Run `f` against a copy of the document under the lock, persist the
    /// copy, and only then make it the live state. A failed write leaves the
    /// in-memory state untouched.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut guard = self.inner.document.lock().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.flush(&next).await?;
        *guard = next;
        Ok(out)
    }

    async fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
        let guard = self.inner.document.lock().await;
        f(&guard)
    }
}

impl AgentRepository for JsonAgentStore {
    async fn create(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        self.mutate(|doc| {
            if doc.find(&agent.id).is_some() {
                return Err(RepositoryError::Conflict(format!(
                    "agent '{}' already exists",
                    agent.id
                )));
            }
            doc.agents.push(AgentRecord {
                agent: agent.clone(),
                transactions: Vec::new(),
            });
            Ok(agent.clone())
        })
        .await
    }

    async fn get_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.read(|doc| doc.find(id).map(|r| r.agent.clone())).await)
    }

    async fn list(&self, filter: Option<AgentFilter>) -> Result<Vec<Agent>, RepositoryError> {
        let agents = self
            .read(|doc| doc.agents.iter().map(|r| r.agent.clone()).collect::<Vec<_>>())
            .await;
        Ok(filter.unwrap_or_default().apply(agents))
    }

    async fn update(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        self.mutate(|doc| {
            let record = doc.find_mut(&agent.id).ok_or(RepositoryError::NotFound)?;
            let nft = record.agent.nft.take();
            record.agent = Agent {
                nft,
                ..agent.clone()
            };
            Ok(record.agent.clone())
        })
        .await
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        self.mutate(|doc| {
            let before = doc.agents.len();
            doc.agents.retain(|r| r.agent.id != *id);
            if doc.agents.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }
}

impl NftRepository for JsonAgentStore {
    async fn attach(&self, agent_id: &AgentId, nft: &Nft) -> Result<Nft, RepositoryError> {
        self.mutate(|doc| {
            let record = doc.find_mut(agent_id).ok_or(RepositoryError::NotFound)?;
            if record.agent.nft.is_some() {
                return Err(RepositoryError::Conflict(format!(
                    "agent {agent_id} already has an NFT"
                )));
            }
            record.agent.nft = Some(nft.clone());
            Ok(nft.clone())
        })
        .await
    }

    async fn record_purchase(
        &self,
        order: &PurchaseOrder,
    ) -> Result<PurchaseReceipt, RepositoryError> {
        self.mutate(|doc| {
            let record = doc
                .find_mut(&order.agent_id)
                .ok_or(RepositoryError::NotFound)?;
            let nft = record.agent.nft.as_mut().ok_or(RepositoryError::NotFound)?;
            if nft.supply == 0 {
                return Err(RepositoryError::OutOfStock);
            }

            nft.supply -= 1;
            nft.last_sale = Some(LastSale {
                buyer: order.buyer_address.clone(),
                price: nft.price,
                timestamp: order.timestamp,
            });

            let transaction = Transaction {
                id: order.transaction_id,
                agent_id: order.agent_id,
                nft_id: nft.id,
                buyer_address: order.buyer_address.clone(),
                seller_address: if nft.creator_address.is_empty() {
                    ZERO_ADDRESS.to_string()
                } else {
                    nft.creator_address.clone()
                },
                price: nft.price,
                timestamp: order.timestamp,
                transaction_hash: order.transaction_hash.clone(),
            };
            let nft = nft.clone();
            record.transactions.push(transaction.clone());

            Ok(PurchaseReceipt { nft, transaction })
        })
        .await
    }

    async fn transactions_for_agent(
        &self,
        agent_id: &AgentId,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        Ok(self
            .read(|doc| {
                doc.find(agent_id)
                    .map(|r| r.transactions.iter().rev().cloned().collect())
                    .unwrap_or_default()
            })
            .await)
    }

    async fn transactions_for_buyer(
        &self,
        buyer_address: &str,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let mut matches: Vec<Transaction> = self
            .read(|doc| {
                doc.agents
                    .iter()
                    .flat_map(|r| r.transactions.iter())
                    .filter(|t| t.buyer_address.eq_ignore_ascii_case(buyer_address))
                    .cloned()
                    .collect()
            })
            .await;
        // Stable sort keeps per-agent insertion order for equal timestamps.
        matches.reverse();
        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matches)
    }
}
