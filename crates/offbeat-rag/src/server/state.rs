//! Application state for the query server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::pipeline::RagPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Query pipeline (cheap to clone, shared across requests)
    pipeline: RagPipeline,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state with the backends named in `config`
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!(
            "Initializing application state (search backend: {:?})...",
            config.search.backend
        );

        let pipeline = RagPipeline::from_config(&config)?;
        tracing::info!(
            "Pipeline ready (encoder: {}, store: {}, generator: {})",
            pipeline.collaborators().encoder.name(),
            pipeline.collaborators().store.name(),
            pipeline.collaborators().generator.name()
        );

        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Create application state around an existing pipeline
    pub fn with_pipeline(config: RagConfig, pipeline: RagPipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the query pipeline
    pub fn pipeline(&self) -> &RagPipeline {
        &self.inner.pipeline
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
