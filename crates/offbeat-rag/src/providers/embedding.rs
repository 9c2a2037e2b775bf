//! Query encoder trait

use async_trait::async_trait;
use crate::error::Result;

/// Maps free text to a fixed-length embedding vector
///
/// Implementations:
/// - `OllamaEmbedder`: Ollama server (all-minilm by default)
///
/// Implementations must be deterministic for a fixed model version and must
/// fail with `Error::Encoding` rather than return an empty vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimensions, agreed with the search store's index
    fn dimensions(&self) -> usize;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
