//! LlmProvider trait definition.
//!
//! This is the core abstraction every completion backend implements.

use agentmint_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion provider backends (OpenAI-compatible endpoints, fakes).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in agentmint-infra (e.g., `OpenAiCompletionProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
