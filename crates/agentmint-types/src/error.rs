use thiserror::Error;

/// Errors related to agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent not found")]
    NotFound,

    #[error("invalid agent: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors related to chat operations.
///
/// Completion failures never appear here: they are recovered into a
/// fallback reply by the response generator.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("agent not found")]
    AgentNotFound,

    #[error("invalid message: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors related to NFT minting and purchase.
#[derive(Debug, Error)]
pub enum NftError {
    #[error("agent not found")]
    AgentNotFound,

    #[error("agent has no NFT")]
    NftNotFound,

    #[error("agent already has an NFT")]
    AlreadyMinted,

    #[error("NFT is sold out")]
    OutOfStock,

    #[error("invalid NFT request: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from the wallet gateway.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet connection required")]
    NotConnected,

    #[error("invalid wallet address: '{0}'")]
    InvalidAddress(String),
}

/// Errors from repository operations (used by trait definitions in agentmint-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("out of stock")]
    OutOfStock,
}
