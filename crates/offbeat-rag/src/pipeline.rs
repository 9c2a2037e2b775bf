//! Retrieval-augmented query pipeline
//!
//! encode → search → build prompt → generate. Strictly sequential, no
//! retries, no caching, no state carried between queries. Each call either
//! returns a complete answer or exactly one of the encoding / retrieval /
//! generation errors.

use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::{EmptyContextPolicy, RagConfig, SearchBackend};
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{
    ElasticsearchStore, EmbeddingProvider, InMemoryStore, LlmProvider, OllamaEmbedder,
    OpenAiGenerator, SearchProvider,
};
use crate::retrieval::rank_passages;
use crate::types::{Query, QueryResponse, RetrievedPassage};

/// The three external services the pipeline drives
#[derive(Clone)]
pub struct Collaborators {
    /// Query encoder
    pub encoder: Arc<dyn EmbeddingProvider>,
    /// Similarity search store
    pub store: Arc<dyn SearchProvider>,
    /// Answer generator
    pub generator: Arc<dyn LlmProvider>,
}

impl Collaborators {
    /// Build the configured backends
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let encoder = Arc::new(OllamaEmbedder::new(&config.embeddings)?);

        let store: Arc<dyn SearchProvider> = match config.search.backend {
            SearchBackend::Elasticsearch => {
                let store = ElasticsearchStore::new(&config.search)?;
                tracing::info!("Using Elasticsearch at {}", store.base_url());
                Arc::new(store)
            }
            SearchBackend::Memory => Arc::new(InMemoryStore::from_config(&config.search)?),
        };

        let generator = Arc::new(OpenAiGenerator::new(&config.llm)?);

        Ok(Self {
            encoder,
            store,
            generator,
        })
    }
}

/// Identifiers and policies the caller resolves for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Index to search
    pub index: String,
    /// Generation model identifier
    pub model: String,
    /// Passages to retrieve (at least 1)
    pub top_k: usize,
    /// Behaviour when retrieval comes back empty
    pub empty_context: EmptyContextPolicy,
}

impl PipelineOptions {
    pub fn from_config(config: &RagConfig) -> Self {
        Self {
            index: config.search.index.clone(),
            model: config.llm.model.clone(),
            top_k: config.pipeline.top_k,
            empty_context: config.pipeline.empty_context,
        }
    }
}

/// Grounded travel-question answering
///
/// Cheap to clone; clones share the collaborator handles.
#[derive(Clone)]
pub struct RagPipeline {
    collaborators: Collaborators,
    options: Arc<PipelineOptions>,
}

impl RagPipeline {
    /// Create a pipeline over already-configured collaborators
    pub fn new(collaborators: Collaborators, options: PipelineOptions) -> Result<Self> {
        if options.top_k == 0 {
            return Err(Error::config("top_k must be at least 1"));
        }

        Ok(Self {
            collaborators,
            options: Arc::new(options),
        })
    }

    /// Create a pipeline with the backends named in `config`
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            Collaborators::from_config(config)?,
            PipelineOptions::from_config(config),
        )
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Answer a travel question
    pub async fn answer(&self, query: &str) -> Result<String> {
        self.answer_detailed(query).await.map(|response| response.answer)
    }

    /// Answer a travel question, also returning the passages it was grounded on
    pub async fn answer_detailed(&self, query: &str) -> Result<QueryResponse> {
        let start = Instant::now();
        let request_id = Uuid::new_v4();
        // Blank input is rejected here; the caller's text is used verbatim downstream
        let parsed = Query::parse(query)?;

        tracing::info!(%request_id, "Query: \"{}\"", parsed);

        let query_vector = self.encode(query).await?;
        let passages = self.retrieve(&query_vector).await?;

        let context_texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let prompt = PromptBuilder::build_prompt(&context_texts, query);
        tracing::debug!(%request_id, "Prompt built ({} chars)", prompt.len());

        let answer = self.generate(&prompt).await?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            %request_id,
            "Query completed in {}ms, {} passages",
            processing_time_ms,
            passages.len()
        );

        Ok(QueryResponse {
            answer,
            passages,
            model: self.options.model.clone(),
            request_id,
            processing_time_ms,
        })
    }

    async fn encode(&self, query: &str) -> Result<Vec<f32>> {
        let encoder = &self.collaborators.encoder;
        let vector = encoder.embed(query).await.map_err(|e| match e {
            Error::Encoding(_) | Error::EmptyQuery => e,
            other => Error::encoding(other.to_string()),
        })?;

        if vector.is_empty() {
            return Err(Error::encoding(format!(
                "{} returned an empty vector",
                encoder.name()
            )));
        }
        if vector.len() != encoder.dimensions() {
            return Err(Error::encoding(format!(
                "{} returned {} dimensions, expected {}",
                encoder.name(),
                vector.len(),
                encoder.dimensions()
            )));
        }

        tracing::debug!("Encoded query with {} ({} dims)", encoder.name(), vector.len());
        Ok(vector)
    }

    async fn retrieve(&self, query_vector: &[f32]) -> Result<Vec<RetrievedPassage>> {
        let store = &self.collaborators.store;
        let passages = store
            .search(&self.options.index, query_vector, self.options.top_k)
            .await
            .map_err(|e| match e {
                Error::Retrieval(_) => e,
                other => Error::retrieval(other.to_string()),
            })?;

        // Stores promise descending order and at most top_k; enforce it anyway
        let passages = rank_passages(passages, self.options.top_k);

        if passages.is_empty() {
            match self.options.empty_context {
                EmptyContextPolicy::Proceed => {
                    tracing::warn!(
                        "No passages found in '{}'; generating without context",
                        self.options.index
                    );
                }
                EmptyContextPolicy::Fail => {
                    return Err(Error::retrieval(format!(
                        "No passages found in '{}'",
                        self.options.index
                    )));
                }
            }
        }

        tracing::debug!("Retrieved {} passages from {}", passages.len(), store.name());
        Ok(passages)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let generator = &self.collaborators.generator;
        let completion = generator
            .generate(prompt, &self.options.model)
            .await
            .map_err(|e| match e {
                Error::Generation(_) => e,
                other => Error::generation(other.to_string()),
            })?;

        if completion.text.trim().is_empty() {
            return Err(Error::generation(format!(
                "{} returned an empty completion",
                generator.name()
            )));
        }

        Ok(completion.text)
    }
}
