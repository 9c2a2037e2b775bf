//! In-memory similarity search over a JSON snapshot of the index
//!
//! Scores every document with the same `cosine + 1.0` function the
//! Elasticsearch script uses, so results are interchangeable.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::retrieval::{rank_passages, script_score};
use crate::types::RetrievedPassage;

use super::vector_store::SearchProvider;

/// A stored record: text plus its precomputed embedding
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub text: String,
    pub vector: Vec<f32>,
}

/// Brute-force store holding named indexes in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    indexes: HashMap<String, Vec<StoredDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `config.snapshot_path` into `config.index`
    ///
    /// The snapshot is a JSON array of documents shaped like the
    /// Elasticsearch `_source`, e.g. `{"summary": "...", "embedding": [...]}`.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let path = config
            .snapshot_path
            .as_deref()
            .ok_or_else(|| Error::config("Memory backend needs search.snapshot_path"))?;
        let documents = load_snapshot(path, &config.text_field, &config.vector_field)?;

        tracing::info!(
            "Loaded {} documents into in-memory index '{}'",
            documents.len(),
            config.index
        );

        Ok(Self::new().with_documents(&config.index, documents))
    }

    /// Add documents to `index`, creating it if needed
    pub fn with_documents(
        mut self,
        index: &str,
        documents: impl IntoIterator<Item = StoredDocument>,
    ) -> Self {
        self.indexes
            .entry(index.to_string())
            .or_default()
            .extend(documents);
        self
    }

    /// Number of documents in `index`
    pub fn len(&self, index: &str) -> usize {
        self.indexes.get(index).map_or(0, Vec::len)
    }
}

fn load_snapshot(path: &Path, text_field: &str, vector_field: &str) -> Result<Vec<StoredDocument>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read snapshot '{}': {}", path.display(), e))
    })?;
    parse_snapshot(&content, text_field, vector_field)
}

fn parse_snapshot(content: &str, text_field: &str, vector_field: &str) -> Result<Vec<StoredDocument>> {
    let records: Vec<serde_json::Map<String, Value>> = serde_json::from_str(content)?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let text = record
                .get(text_field)
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    Error::config(format!("Snapshot record {} has no '{}' field", i, text_field))
                })?
                .to_string();

            let vector: Vec<f32> = record
                .get(vector_field)
                .cloned()
                .map(serde_json::from_value)
                .transpose()?
                .ok_or_else(|| {
                    Error::config(format!("Snapshot record {} has no '{}' field", i, vector_field))
                })?;

            Ok(StoredDocument { text, vector })
        })
        .collect()
}

#[async_trait]
impl SearchProvider for InMemoryStore {
    async fn search(
        &self,
        index: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>> {
        let documents = self
            .indexes
            .get(index)
            .ok_or_else(|| Error::retrieval(format!("Index '{}' does not exist", index)))?;

        let scored = documents
            .iter()
            .map(|doc| {
                if doc.vector.len() != query_vector.len() {
                    return Err(Error::retrieval(format!(
                        "Query vector has {} dimensions but index '{}' stores {}",
                        query_vector.len(),
                        index,
                        doc.vector.len()
                    )));
                }
                Ok(RetrievedPassage::new(
                    doc.text.clone(),
                    script_score(query_vector, &doc.vector),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(rank_passages(scored, top_k))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::MAX_SCORE;

    const INDEX: &str = "offbeat-destinations";

    fn doc(text: &str, vector: &[f32]) -> StoredDocument {
        StoredDocument {
            text: text.to_string(),
            vector: vector.to_vec(),
        }
    }

    fn valleys() -> InMemoryStore {
        InMemoryStore::new().with_documents(
            INDEX,
            vec![
                doc("Chitkul last village.", &[0.0, 1.0, 0.0]),
                doc("Parvati Valley hidden villages.", &[1.0, 0.0, 0.0]),
                doc("Tirthan Valley trout fishing.", &[0.8, 0.6, 0.0]),
                doc("Majuli river island.", &[0.0, 0.0, 1.0]),
            ],
        )
    }

    #[tokio::test]
    async fn test_search_ranks_by_descending_score() {
        let results = valleys().search(INDEX, &[1.0, 0.1, 0.0], 3).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].text, "Parvati Valley hidden villages.");
        assert_eq!(results[1].text, "Tirthan Valley trout fishing.");
        assert_eq!(results[2].text, "Chitkul last village.");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(results.iter().all(|r| (0.0..=MAX_SCORE).contains(&r.score)));
    }

    #[tokio::test]
    async fn test_identical_vector_gets_max_score() {
        let results = valleys().search(INDEX, &[0.0, 0.0, 1.0], 1).await.unwrap();
        assert_eq!(results[0].text, "Majuli river island.");
        assert!((results[0].score - MAX_SCORE).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_top_k_larger_than_index() {
        let results = valleys().search(INDEX, &[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 4);
    }

    #[tokio::test]
    async fn test_empty_index_returns_nothing() {
        let store = InMemoryStore::new().with_documents(INDEX, Vec::new());
        assert!(store.search(INDEX, &[1.0], 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_index_is_a_retrieval_error() {
        let err = valleys().search("hill-stations", &[1.0, 0.0, 0.0], 3).await.unwrap_err();
        assert!(matches!(err, Error::Retrieval(_)));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_a_retrieval_error() {
        let err = valleys().search(INDEX, &[1.0, 0.0], 3).await.unwrap_err();
        assert!(matches!(err, Error::Retrieval(_)));
    }

    #[test]
    fn test_parse_snapshot() {
        let docs = parse_snapshot(
            r#"[
                {"summary": "Ziro Valley rice terraces.", "embedding": [0.1, 0.2]},
                {"summary": "Gokarna quiet beaches.", "embedding": [0.3, 0.4], "state": "Karnataka"}
            ]"#,
            "summary",
            "embedding",
        )
        .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].text, "Gokarna quiet beaches.");
        assert_eq!(docs[0].vector, vec![0.1, 0.2]);
    }

    #[test]
    fn test_parse_snapshot_missing_field() {
        let result = parse_snapshot(r#"[{"summary": "No vector."}]"#, "summary", "embedding");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_config_requires_snapshot_path() {
        let result = InMemoryStore::from_config(&SearchConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_config_loads_snapshot() {
        let path = std::env::temp_dir().join(format!("offbeat-snapshot-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{"summary": "Ziro Valley rice terraces.", "embedding": [0.0, 1.0]}]"#,
        )
        .unwrap();

        let config = SearchConfig {
            snapshot_path: Some(path.clone()),
            ..SearchConfig::default()
        };
        let store = InMemoryStore::from_config(&config).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(store.len(INDEX), 1);
        let results = tokio_test::block_on(store.search(INDEX, &[0.0, 1.0], 3)).unwrap();
        assert_eq!(results[0].text, "Ziro Valley rice terraces.");
    }

    #[test]
    fn test_len() {
        let store = valleys();
        assert_eq!(store.len(INDEX), 4);
        assert_eq!(store.len("other"), 0);
    }
}
