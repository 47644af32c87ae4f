//! Backend selection.
//!
//! The repository traits use RPITIT and are not object-safe, so the backend
//! chosen in `config.toml` is carried as an enum that delegates each call.

use std::path::Path;

use agentmint_core::chat::repository::ChatRepository;
use agentmint_core::repository::agent::{AgentFilter, AgentRepository};
use agentmint_core::repository::nft::NftRepository;
use agentmint_types::agent::{Agent, AgentId};
use agentmint_types::chat::ChatMessage;
use agentmint_types::config::{GlobalConfig, StorageBackend};
use agentmint_types::error::RepositoryError;
use agentmint_types::nft::{Nft, PurchaseOrder, PurchaseReceipt, Transaction};

use crate::config::{database_url, json_store_path};
use crate::json::store::JsonAgentStore;
use crate::memory::chat::MemoryChatRepository;
use crate::sqlite::agent::SqliteAgentRepository;
use crate::sqlite::chat::SqliteChatRepository;
use crate::sqlite::nft::SqliteNftRepository;
use crate::sqlite::pool::DatabasePool;

/// Agent catalog and NFT ledger storage.
#[derive(Clone)]
pub enum CatalogStore {
    Json(JsonAgentStore),
    Sqlite {
        pool: DatabasePool,
        agents: SqliteAgentRepository,
        nfts: SqliteNftRepository,
    },
}

/// Chat history storage.
#[derive(Clone)]
pub enum ChatStore {
    Memory(MemoryChatRepository),
    Sqlite(SqliteChatRepository),
}

/// Open the configured backend. The JSON backend pairs with an in-memory
/// chat log; the SQLite backend persists chat alongside everything else.
pub async fn open_stores(
    config: &GlobalConfig,
    data_dir: &Path,
) -> Result<(CatalogStore, ChatStore), RepositoryError> {
    match config.storage.backend {
        StorageBackend::Json => {
            let store = JsonAgentStore::open(json_store_path(config, data_dir)).await?;
            Ok((
                CatalogStore::Json(store),
                ChatStore::Memory(MemoryChatRepository::new()),
            ))
        }
        StorageBackend::Sqlite => {
            tokio::fs::create_dir_all(data_dir).await.map_err(|e| {
                RepositoryError::Query(format!("failed to create {}: {e}", data_dir.display()))
            })?;
            let pool = DatabasePool::new(&database_url(data_dir))
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            Ok((
                CatalogStore::Sqlite {
                    agents: SqliteAgentRepository::new(pool.clone()),
                    nfts: SqliteNftRepository::new(pool.clone()),
                    pool: pool.clone(),
                },
                ChatStore::Sqlite(SqliteChatRepository::new(pool)),
            ))
        }
    }
}

impl CatalogStore {
    pub fn backend(&self) -> StorageBackend {
        match self {
            CatalogStore::Json(_) => StorageBackend::Json,
            CatalogStore::Sqlite { .. } => StorageBackend::Sqlite,
        }
    }

    /// Whether the backend can currently serve requests.
    pub async fn is_healthy(&self) -> bool {
        match self {
            CatalogStore::Json(_) => true,
            CatalogStore::Sqlite { pool, .. } => pool.ping().await,
        }
    }

    /// Flush and release the backend on shutdown.
    pub async fn close(&self) -> Result<(), RepositoryError> {
        match self {
            CatalogStore::Json(store) => store.close().await,
            CatalogStore::Sqlite { pool, .. } => {
                pool.close().await;
                Ok(())
            }
        }
    }
}

impl AgentRepository for CatalogStore {
    async fn create(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        match self {
            CatalogStore::Json(s) => s.create(agent).await,
            CatalogStore::Sqlite { agents, .. } => agents.create(agent).await,
        }
    }

    async fn get_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        match self {
            CatalogStore::Json(s) => s.get_by_id(id).await,
            CatalogStore::Sqlite { agents, .. } => agents.get_by_id(id).await,
        }
    }

    async fn list(&self, filter: Option<AgentFilter>) -> Result<Vec<Agent>, RepositoryError> {
        match self {
            CatalogStore::Json(s) => s.list(filter).await,
            CatalogStore::Sqlite { agents, .. } => agents.list(filter).await,
        }
    }

    async fn update(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        match self {
            CatalogStore::Json(s) => s.update(agent).await,
            CatalogStore::Sqlite { agents, .. } => agents.update(agent).await,
        }
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        match self {
            CatalogStore::Json(s) => s.delete(id).await,
            CatalogStore::Sqlite { agents, .. } => agents.delete(id).await,
        }
    }
}

impl NftRepository for CatalogStore {
    async fn attach(&self, agent_id: &AgentId, nft: &Nft) -> Result<Nft, RepositoryError> {
        match self {
            CatalogStore::Json(s) => s.attach(agent_id, nft).await,
            CatalogStore::Sqlite { nfts, .. } => nfts.attach(agent_id, nft).await,
        }
    }

    async fn record_purchase(
        &self,
        order: &PurchaseOrder,
    ) -> Result<PurchaseReceipt, RepositoryError> {
        match self {
            CatalogStore::Json(s) => s.record_purchase(order).await,
            CatalogStore::Sqlite { nfts, .. } => nfts.record_purchase(order).await,
        }
    }

    async fn transactions_for_agent(
        &self,
        agent_id: &AgentId,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        match self {
            CatalogStore::Json(s) => s.transactions_for_agent(agent_id).await,
            CatalogStore::Sqlite { nfts, .. } => nfts.transactions_for_agent(agent_id).await,
        }
    }

    async fn transactions_for_buyer(
        &self,
        buyer_address: &str,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        match self {
            CatalogStore::Json(s) => s.transactions_for_buyer(buyer_address).await,
            CatalogStore::Sqlite { nfts, .. } => nfts.transactions_for_buyer(buyer_address).await,
        }
    }
}

impl ChatRepository for ChatStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        match self {
            ChatStore::Memory(s) => s.append(message).await,
            ChatStore::Sqlite(s) => s.append(message).await,
        }
    }

    async fn get_messages(
        &self,
        agent_id: &AgentId,
        last: Option<usize>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        match self {
            ChatStore::Memory(s) => s.get_messages(agent_id, last).await,
            ChatStore::Sqlite(s) => s.get_messages(agent_id, last).await,
        }
    }

    async fn delete_messages(&self, agent_id: &AgentId) -> Result<(), RepositoryError> {
        match self {
            ChatStore::Memory(s) => s.delete_messages(agent_id).await,
            ChatStore::Sqlite(s) => s.delete_messages(agent_id).await,
        }
    }
}
