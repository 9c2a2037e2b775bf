//! Provider abstractions for the query encoder, the similarity search store,
//! and the answer generator
//!
//! The pipeline only sees the traits, so any backend (or a test double) can
//! be plugged in.

pub mod elasticsearch;
pub mod embedding;
pub mod llm;
pub mod memory;
pub mod ollama;
pub mod openai;
pub mod vector_store;

pub use elasticsearch::ElasticsearchStore;
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use memory::{InMemoryStore, StoredDocument};
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiGenerator;
pub use vector_store::SearchProvider;
