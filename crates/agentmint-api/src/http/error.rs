//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use agentmint_types::error::{AgentError, ChatError, NftError, WalletError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Agent(AgentError),
    Chat(ChatError),
    Nft(NftError),
    Wallet(WalletError),
    /// Malformed request (bad form field, unparseable number).
    Validation(String),
}

impl From<AgentError> for AppError {
    fn from(e: AgentError) -> Self {
        AppError::Agent(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<NftError> for AppError {
    fn from(e: NftError) -> Self {
        AppError::Nft(e)
    }
}

impl From<WalletError> for AppError {
    fn from(e: WalletError) -> Self {
        AppError::Wallet(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Agent(AgentError::NotFound)
            | AppError::Chat(ChatError::AgentNotFound)
            | AppError::Nft(NftError::AgentNotFound) => (StatusCode::NOT_FOUND, "AGENT_NOT_FOUND"),
            AppError::Nft(NftError::NftNotFound) => (StatusCode::NOT_FOUND, "NFT_NOT_FOUND"),
            AppError::Nft(NftError::AlreadyMinted) => (StatusCode::CONFLICT, "NFT_CONFLICT"),
            AppError::Nft(NftError::OutOfStock) => (StatusCode::CONFLICT, "OUT_OF_STOCK"),
            AppError::Agent(AgentError::Validation(_))
            | AppError::Chat(ChatError::Validation(_))
            | AppError::Nft(NftError::Validation(_))
            | AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Wallet(_) => (StatusCode::BAD_REQUEST, "WALLET_ERROR"),
            AppError::Agent(AgentError::Storage(_))
            | AppError::Chat(ChatError::Storage(_))
            | AppError::Nft(NftError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Agent(e) => e.to_string(),
            AppError::Chat(e) => e.to_string(),
            AppError::Nft(e) => e.to_string(),
            AppError::Wallet(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        } else {
            tracing::debug!(code, %message, "request rejected");
        }

        let body = ApiResponse::error(code, &message, uuid::Uuid::now_v7().to_string(), 0);
        (status, Json(body)).into_response()
    }
}
