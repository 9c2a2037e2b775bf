//! Configuration for the travel advisor

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Query encoder configuration
    pub embeddings: EmbeddingConfig,
    /// Similarity search store configuration
    pub search: SearchConfig,
    /// Answer generator configuration
    pub llm: LlmConfig,
    /// Pipeline behaviour
    pub pipeline: PipelineConfig,
}

impl RagConfig {
    /// Load configuration: defaults, then the TOML file (explicit path or
    /// `RAG_CONFIG`), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("RAG_CONFIG").ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML configuration text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = lookup("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = lookup("ES_CLOUD_ID") {
            self.search.cloud_id = Some(v);
        }
        if let Some(v) = lookup("ES_URL") {
            self.search.url = Some(v);
        }
        if let Some(v) = lookup("ES_USERNAME") {
            self.search.username = Some(v);
        }
        if let Some(v) = lookup("ES_PASSWORD") {
            self.search.password = Some(v);
        }
        if let Some(v) = lookup("ES_INDEX") {
            self.search.index = v;
        }
        if let Some(v) = lookup("OLLAMA_BASE_URL") {
            self.embeddings.base_url = v;
        }
        if let Some(v) = lookup("EMBED_MODEL") {
            self.embeddings.model = v;
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.top_k == 0 {
            return Err(Error::config("pipeline.top_k must be at least 1"));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::config("embeddings.dimensions must be at least 1"));
        }
        if self.search.index.trim().is_empty() {
            return Err(Error::config("search.index must not be empty"));
        }
        match self.search.backend {
            SearchBackend::Elasticsearch => {
                if self.search.url.is_none() && self.search.cloud_id.is_none() {
                    return Err(Error::config(
                        "Elasticsearch backend needs search.url or search.cloud_id (ES_URL / ES_CLOUD_ID)",
                    ));
                }
            }
            SearchBackend::Memory => {
                if self.search.snapshot_path.is_none() {
                    return Err(Error::config(
                        "Memory backend needs search.snapshot_path",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Query encoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model (all-MiniLM-L6-v2 family by default)
    pub model: String,
    /// Embedding dimensions, must match the vectors stored in the index
    pub dimensions: usize,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            dimensions: 384,
            timeout_secs: 30,
        }
    }
}

/// Which similarity search store to use
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// Elasticsearch / Elastic Cloud with `script_score` cosine ranking
    #[default]
    Elasticsearch,
    /// Brute-force in-memory store loaded from a JSON snapshot
    Memory,
}

/// Similarity search store configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Store backend
    pub backend: SearchBackend,
    /// Elasticsearch URL (takes precedence over `cloud_id`)
    pub url: Option<String>,
    /// Elastic Cloud id
    pub cloud_id: Option<String>,
    /// Basic auth username
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Index holding the destination documents
    pub index: String,
    /// Document field carrying the passage text
    pub text_field: String,
    /// Document field carrying the precomputed embedding
    pub vector_field: String,
    /// JSON snapshot for the memory backend
    pub snapshot_path: Option<PathBuf>,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: SearchBackend::Elasticsearch,
            url: None,
            cloud_id: None,
            username: None,
            password: None,
            index: "offbeat-destinations".to_string(),
            text_field: "summary".to_string(),
            vector_field: "embedding".to_string(),
            snapshot_path: None,
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("backend", &self.backend)
            .field("url", &self.url)
            .field("cloud_id", &self.cloud_id.as_ref().map(|_| "<set>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("index", &self.index)
            .field("text_field", &self.text_field)
            .field("vector_field", &self.vector_field)
            .field("snapshot_path", &self.snapshot_path)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Answer generator configuration (OpenAI-compatible chat completions)
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// Bearer token
    pub api_key: Option<String>,
    /// Generation model name
    pub model: String,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4".to_string(),
            timeout_secs: 120,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// What to do when retrieval returns no documents
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyContextPolicy {
    /// Ask the generator anyway, with an empty context block
    #[default]
    Proceed,
    /// Abort the query with a retrieval error
    Fail,
}

/// Pipeline behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of passages to retrieve
    pub top_k: usize,
    /// Behaviour on zero retrieved passages
    pub empty_context: EmptyContextPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            empty_context: EmptyContextPolicy::Proceed,
        }
    }
}
