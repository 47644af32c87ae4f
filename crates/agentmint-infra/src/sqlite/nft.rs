//! SQLite NFT ledger implementation.
//!
//! Implements `NftRepository` from `agentmint-core`. A purchase runs as one
//! transaction on the single-connection writer pool: a guarded
//! `supply = supply - 1` update, a re-read of the NFT, and the transaction
//! insert either all commit or none do.

use agentmint_core::repository::nft::NftRepository;
use agentmint_types::agent::AgentId;
use agentmint_types::error::RepositoryError;
use agentmint_types::nft::{
    LastSale, Nft, NftId, PurchaseOrder, PurchaseReceipt, Transaction, ZERO_ADDRESS,
};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_decimal, query_error};

/// NFT columns aliased with an `nft_` prefix so they can ride along on an
/// agent query (`LEFT JOIN nfts n`).
pub(super) const NFT_COLUMNS: &str = "n.id AS nft_id, n.name AS nft_name, \
     n.description AS nft_description, n.image AS nft_image, n.supply AS nft_supply, \
     n.price AS nft_price, n.creator_address AS nft_creator_address, \
     n.created_at AS nft_created_at, n.last_sale_buyer AS nft_last_sale_buyer, \
     n.last_sale_price AS nft_last_sale_price, n.last_sale_at AS nft_last_sale_at";

/// SQLite-backed implementation of `NftRepository`.
#[derive(Clone)]
pub struct SqliteNftRepository {
    pool: DatabasePool,
}

impl SqliteNftRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for an NFT selected with [`NFT_COLUMNS`].
pub(super) struct NftRow {
    id: String,
    name: String,
    description: String,
    image: String,
    supply: i64,
    price: String,
    creator_address: String,
    created_at: String,
    last_sale_buyer: Option<String>,
    last_sale_price: Option<String>,
    last_sale_at: Option<String>,
}

impl NftRow {
    /// Returns `None` when the joined NFT columns are all NULL.
    pub(super) fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Option<Self>, sqlx::Error> {
        let id: Option<String> = row.try_get("nft_id")?;
        let Some(id) = id else {
            return Ok(None);
        };
        Ok(Some(Self {
            id,
            name: row.try_get("nft_name")?,
            description: row.try_get("nft_description")?,
            image: row.try_get("nft_image")?,
            supply: row.try_get("nft_supply")?,
            price: row.try_get("nft_price")?,
            creator_address: row.try_get("nft_creator_address")?,
            created_at: row.try_get("nft_created_at")?,
            last_sale_buyer: row.try_get("nft_last_sale_buyer")?,
            last_sale_price: row.try_get("nft_last_sale_price")?,
            last_sale_at: row.try_get("nft_last_sale_at")?,
        }))
    }

    pub(super) fn into_nft(self) -> Result<Nft, RepositoryError> {
        let id = self
            .id
            .parse::<NftId>()
            .map_err(|e| RepositoryError::Query(format!("invalid nft id: {e}")))?;
        let supply = u32::try_from(self.supply)
            .map_err(|_| RepositoryError::Query(format!("invalid supply: {}", self.supply)))?;

        let last_sale = match (self.last_sale_buyer, self.last_sale_price, self.last_sale_at) {
            (Some(buyer), Some(price), Some(at)) => Some(LastSale {
                buyer,
                price: parse_decimal(&price)?,
                timestamp: parse_datetime(&at)?,
            }),
            _ => None,
        };

        Ok(Nft {
            id,
            name: self.name,
            description: self.description,
            image: self.image,
            supply,
            price: parse_decimal(&self.price)?,
            creator_address: self.creator_address,
            created_at: parse_datetime(&self.created_at)?,
            last_sale,
        })
    }
}

struct TransactionRow {
    id: String,
    agent_id: String,
    nft_id: String,
    buyer_address: String,
    seller_address: String,
    price: String,
    transaction_hash: Option<String>,
    created_at: String,
}

impl TransactionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            nft_id: row.try_get("nft_id")?,
            buyer_address: row.try_get("buyer_address")?,
            seller_address: row.try_get("seller_address")?,
            price: row.try_get("price")?,
            transaction_hash: row.try_get("transaction_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_transaction(self) -> Result<Transaction, RepositoryError> {
        Ok(Transaction {
            id: self
                .id
                .parse()
                .map_err(|e| RepositoryError::Query(format!("invalid transaction id: {e}")))?,
            agent_id: self
                .agent_id
                .parse()
                .map_err(|e| RepositoryError::Query(format!("invalid agent id: {e}")))?,
            nft_id: self
                .nft_id
                .parse()
                .map_err(|e| RepositoryError::Query(format!("invalid nft id: {e}")))?,
            buyer_address: self.buyer_address,
            seller_address: self.seller_address,
            price: parse_decimal(&self.price)?,
            timestamp: parse_datetime(&self.created_at)?,
            transaction_hash: self.transaction_hash,
        })
    }
}

fn rows_to_transactions(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Transaction>, RepositoryError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let tx_row = TransactionRow::from_row(row).map_err(query_error)?;
        out.push(tx_row.into_transaction()?);
    }
    Ok(out)
}

impl NftRepository for SqliteNftRepository {
    async fn attach(&self, agent_id: &AgentId, nft: &Nft) -> Result<Nft, RepositoryError> {
        let exists = sqlx::query("SELECT 1 FROM agents WHERE id = ?")
            .bind(agent_id.to_string())
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(query_error)?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let result = sqlx::query(
            "INSERT INTO nfts (id, agent_id, name, description, image, supply, price, creator_address, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(nft.id.to_string())
        .bind(agent_id.to_string())
        .bind(&nft.name)
        .bind(&nft.description)
        .bind(&nft.image)
        .bind(i64::from(nft.supply))
        .bind(nft.price.to_string())
        .bind(&nft.creator_address)
        .bind(format_datetime(&nft.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(nft.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("agent {agent_id} already has an NFT")),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn record_purchase(
        &self,
        order: &PurchaseOrder,
    ) -> Result<PurchaseReceipt, RepositoryError> {
        let agent_id = order.agent_id.to_string();
        let sold_at = format_datetime(&order.timestamp);

        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let updated = sqlx::query(
            "UPDATE nfts
             SET supply = supply - 1,
                 last_sale_buyer = ?,
                 last_sale_price = price,
                 last_sale_at = ?
             WHERE agent_id = ? AND supply > 0",
        )
        .bind(&order.buyer_address)
        .bind(&sold_at)
        .bind(&agent_id)
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        if updated.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM nfts WHERE agent_id = ?")
                .bind(&agent_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_error)?;
            tx.rollback().await.map_err(query_error)?;
            return Err(if exists.is_some() {
                RepositoryError::OutOfStock
            } else {
                RepositoryError::NotFound
            });
        }

        let row = sqlx::query(&format!("SELECT {NFT_COLUMNS} FROM nfts n WHERE n.agent_id = ?"))
            .bind(&agent_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(query_error)?;
        let nft = NftRow::from_row(&row)
            .map_err(query_error)?
            .ok_or(RepositoryError::NotFound)?
            .into_nft()?;

        let seller_address = if nft.creator_address.is_empty() {
            ZERO_ADDRESS.to_string()
        } else {
            nft.creator_address.clone()
        };
        let transaction = Transaction {
            id: order.transaction_id,
            agent_id: order.agent_id,
            nft_id: nft.id,
            buyer_address: order.buyer_address.clone(),
            seller_address,
            price: nft.price,
            timestamp: order.timestamp,
            transaction_hash: order.transaction_hash.clone(),
        };

        sqlx::query(
            "INSERT INTO transactions (id, agent_id, nft_id, buyer_address, seller_address, price, transaction_hash, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(transaction.id.to_string())
        .bind(&agent_id)
        .bind(transaction.nft_id.to_string())
        .bind(&transaction.buyer_address)
        .bind(&transaction.seller_address)
        .bind(transaction.price.to_string())
        .bind(&transaction.transaction_hash)
        .bind(&sold_at)
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;

        Ok(PurchaseReceipt { nft, transaction })
    }

    async fn transactions_for_agent(
        &self,
        agent_id: &AgentId,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM transactions WHERE agent_id = ? ORDER BY seq DESC")
            .bind(agent_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows_to_transactions(&rows)
    }

    async fn transactions_for_buyer(
        &self,
        buyer_address: &str,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM transactions WHERE buyer_address = ? COLLATE NOCASE ORDER BY seq DESC",
        )
        .bind(buyer_address)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        rows_to_transactions(&rows)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sqlite::agent::SqliteAgentRepository;
    use crate::sqlite::test_pool;
    use agentmint_core::repository::agent::AgentRepository;
    use agentmint_types::agent::{Agent, AgentStatus, normalize_tools};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    async fn setup() -> (SqliteAgentRepository, SqliteNftRepository, AgentId) {
        let pool = test_pool().await;
        let agents = SqliteAgentRepository::new(pool.clone());
        let now = Utc::now();
        let agent = Agent {
            id: AgentId::new(),
            name: "Atlas".to_string(),
            role: "Travel".to_string(),
            tools: normalize_tools(["web_search"]),
            document: None,
            status: AgentStatus::Active,
            creator_address: None,
            created_at: now,
            updated_at: now,
            nft: None,
        };
        agents.create(&agent).await.unwrap();
        (agents, SqliteNftRepository::new(pool), agent.id)
    }

    fn make_nft(supply: u32) -> Nft {
        Nft {
            id: NftId::new(),
            name: "Atlas Pass".to_string(),
            description: "Lifetime access".to_string(),
            image: "https://example.com/atlas.png".to_string(),
            supply,
            price: dec!(0.05),
            creator_address: "0xcreator".to_string(),
            created_at: Utc::now(),
            last_sale: None,
        }
    }

    fn order(agent_id: AgentId, buyer: &str) -> PurchaseOrder {
        PurchaseOrder {
            transaction_id: Uuid::now_v7(),
            agent_id,
            buyer_address: buyer.to_string(),
            timestamp: Utc::now(),
            transaction_hash: Some("0xfeed".to_string()),
        }
    }

    #[tokio::test]
    async fn test_attach_shows_on_agent() {
        let (agents, nfts, agent_id) = setup().await;
        let nft = make_nft(3);
        nfts.attach(&agent_id, &nft).await.unwrap();

        let agent = agents.get_by_id(&agent_id).await.unwrap().unwrap();
        let stored = agent.nft.unwrap();
        assert_eq!(stored.id, nft.id);
        assert_eq!(stored.price, dec!(0.05));
        assert_eq!(stored.supply, 3);
        assert!(stored.last_sale.is_none());
    }

    #[tokio::test]
    async fn test_attach_twice_conflicts() {
        let (agents, nfts, agent_id) = setup().await;
        nfts.attach(&agent_id, &make_nft(3)).await.unwrap();

        let mut other = make_nft(9);
        other.name = "Other".to_string();
        let result = nfts.attach(&agent_id, &other).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        let stored = agents.get_by_id(&agent_id).await.unwrap().unwrap().nft.unwrap();
        assert_eq!(stored.name, "Atlas Pass");
        assert_eq!(stored.supply, 3);
    }

    #[tokio::test]
    async fn test_attach_unknown_agent() {
        let (_, nfts, _) = setup().await;
        let result = nfts.attach(&AgentId::new(), &make_nft(1)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_purchase_decrements_and_records() {
        let (_, nfts, agent_id) = setup().await;
        nfts.attach(&agent_id, &make_nft(2)).await.unwrap();

        let receipt = nfts.record_purchase(&order(agent_id, "0xBuyer")).await.unwrap();
        assert_eq!(receipt.nft.supply, 1);
        assert_eq!(receipt.transaction.seller_address, "0xcreator");
        assert_eq!(receipt.transaction.price, dec!(0.05));
        assert_eq!(receipt.nft.last_sale.unwrap().buyer, "0xBuyer");

        let by_buyer = nfts.transactions_for_buyer("0xbuyer").await.unwrap();
        assert_eq!(by_buyer.len(), 1);
        assert_eq!(by_buyer[0].transaction_hash.as_deref(), Some("0xfeed"));
    }

    #[tokio::test]
    async fn test_purchase_without_nft_or_stock() {
        let (_, nfts, agent_id) = setup().await;
        assert!(matches!(
            nfts.record_purchase(&order(agent_id, "0xbuyer")).await,
            Err(RepositoryError::NotFound)
        ));

        nfts.attach(&agent_id, &make_nft(1)).await.unwrap();
        nfts.record_purchase(&order(agent_id, "0xbuyer")).await.unwrap();
        assert!(matches!(
            nfts.record_purchase(&order(agent_id, "0xbuyer")).await,
            Err(RepositoryError::OutOfStock)
        ));
        assert_eq!(nfts.transactions_for_agent(&agent_id).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_purchases_never_oversell() {
        let (agents, nfts, agent_id) = setup().await;
        nfts.attach(&agent_id, &make_nft(3)).await.unwrap();
        let nfts = Arc::new(nfts);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let nfts = nfts.clone();
                tokio::spawn(async move {
                    nfts.record_purchase(&order(agent_id, &format!("0xbuyer{i}"))).await
                })
            })
            .collect();

        let mut ok = 0;
        let mut out_of_stock = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(RepositoryError::OutOfStock) => out_of_stock += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!((ok, out_of_stock), (3, 13));

        let stored = agents.get_by_id(&agent_id).await.unwrap().unwrap().nft.unwrap();
        assert_eq!(stored.supply, 0);
        assert_eq!(nfts.transactions_for_agent(&agent_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_transactions_newest_first() {
        let (_, nfts, agent_id) = setup().await;
        nfts.attach(&agent_id, &make_nft(5)).await.unwrap();
        let first = nfts.record_purchase(&order(agent_id, "0xaaa")).await.unwrap();
        let second = nfts.record_purchase(&order(agent_id, "0xbbb")).await.unwrap();

        let all = nfts.transactions_for_agent(&agent_id).await.unwrap();
        assert_eq!(all[0].id, second.transaction.id);
        assert_eq!(all[1].id, first.transaction.id);
    }
}
