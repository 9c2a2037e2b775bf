//! Answer generator trait

use async_trait::async_trait;
use crate::error::Result;
use crate::types::Completion;

/// Single-shot text completion
///
/// Implementations:
/// - `OpenAiGenerator`: OpenAI-compatible chat completions
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Request one completion for `prompt` from `model`
    async fn generate(&self, prompt: &str, model: &str) -> Result<Completion>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
