//! NFT mint, purchase and transaction history handlers.
//!
//! Both mint and purchase go through the wallet gateway first; the ledger
//! only ever sees the normalized address it returns.

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use agentmint_core::wallet::WalletGateway;
use agentmint_types::agent::Agent;
use agentmint_types::nft::{CreateNftRequest, Nft, PurchaseReceipt, Transaction};

use super::parse_agent_id;
use crate::http::error::AppError;
use crate::http::extractors::form::FormData;
use crate::http::extractors::json::JsonBody;
use crate::http::extractors::query::BuyerQuery;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MintedNft {
    pub nft: Nft,
    pub agent: Agent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuyRequest {
    pub agent_id: String,
    pub buyer_address: String,
    pub wallet_connected: bool,
}

#[derive(Debug, Serialize)]
pub struct PurchaseView {
    pub message: String,
    #[serde(flatten)]
    pub receipt: PurchaseReceipt,
}

/// POST /api/v1/nfts/create - Mint an NFT for an agent from a multipart form.
///
/// Fields: `agentId`, `name`, `description`, `price`, `supply`, `image`
/// (file, stored as a data URL, or a URL string), `creatorAddress`,
/// `walletConnected`.
pub async fn create_nft(
    State(state): State<AppState>,
    form: FormData,
) -> Result<Json<ApiResponse<MintedNft>>, AppError> {
    let ctx = RequestContext::start();

    let agent_id = form
        .text("agentId")
        .ok_or_else(|| AppError::Validation("agentId is required".to_string()))?;
    let agent_id = parse_agent_id(agent_id)?;

    let price = required_number::<Decimal>(&form, "price")?;
    let supply = required_number::<i64>(&form, "supply")?;

    let creator = state.wallet.verify(
        form.text("creatorAddress").unwrap_or_default(),
        form.flag("walletConnected"),
    )?;

    let image = match form.file("image") {
        Some(file) => file.data_url(),
        None => form
            .first_text(&["image", "imageUrl"])
            .unwrap_or_default()
            .to_string(),
    };

    let request = CreateNftRequest {
        name: form.text("name").unwrap_or_default().to_string(),
        description: form.text("description").unwrap_or_default().to_string(),
        image,
        supply,
        price,
        creator_address: creator,
    };

    let nft = state.nft_ledger.attach_nft(&agent_id, request).await?;
    let agent = state.agent_service.get_agent(&agent_id).await?;

    Ok(Json(
        ctx.respond(MintedNft { nft, agent })
            .with_link("agent", &format!("/api/v1/agents/{agent_id}"))
            .with_link("buy", "/api/v1/nfts/buy"),
    ))
}

fn required_number<T>(form: &FormData, name: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = form
        .text(name)
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    raw.parse::<T>()
        .map_err(|e| AppError::Validation(format!("invalid {name} '{raw}': {e}")))
}

/// POST /api/v1/nfts/buy - Buy one unit of an agent's NFT.
pub async fn buy_nft(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<BuyRequest>,
) -> Result<Json<ApiResponse<PurchaseView>>, AppError> {
    let ctx = RequestContext::start();

    if body.agent_id.trim().is_empty() {
        return Err(AppError::Validation("agentId is required".to_string()));
    }
    let agent_id = parse_agent_id(&body.agent_id)?;
    let buyer = state
        .wallet
        .verify(&body.buyer_address, body.wallet_connected)?;

    let receipt = state.nft_ledger.purchase(&agent_id, &buyer).await?;

    Ok(Json(
        ctx.respond(PurchaseView {
            message: "NFT purchased".to_string(),
            receipt,
        })
        .with_link("agent", &format!("/api/v1/agents/{agent_id}"))
        .with_link("transactions", &format!("/api/v1/transactions?buyer={buyer}")),
    ))
}

/// GET /api/v1/agents/{id}/transactions - Sales of an agent's NFT, newest first.
pub async fn agent_transactions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, AppError> {
    let ctx = RequestContext::start();
    let id = parse_agent_id(&id)?;

    let transactions = state.nft_ledger.transactions_for_agent(&id).await?;

    Ok(Json(
        ctx.respond(transactions)
            .with_link("agent", &format!("/api/v1/agents/{id}")),
    ))
}

/// GET /api/v1/transactions?buyer=0x.. - Purchases by a buyer, newest first.
pub async fn buyer_transactions(
    State(state): State<AppState>,
    Query(query): Query<BuyerQuery>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, AppError> {
    let ctx = RequestContext::start();

    let transactions = state.nft_ledger.transactions_for_buyer(&query.buyer).await?;

    Ok(Json(ctx.respond(transactions)))
}
