//! Similarity search store trait

use async_trait::async_trait;
use crate::error::Result;
use crate::types::RetrievedPassage;

/// Returns the top-K stored documents most similar to a query vector
///
/// Implementations:
/// - `ElasticsearchStore`: `script_score` cosine ranking over a named index
/// - `InMemoryStore`: brute-force ranking over a loaded snapshot
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search `index` for the `top_k` passages closest to `query_vector`,
    /// ordered by descending score
    async fn search(
        &self,
        index: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
