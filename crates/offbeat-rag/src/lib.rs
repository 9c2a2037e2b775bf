//! offbeat-rag: retrieval-augmented travel advisor for offbeat Indian destinations
//!
//! A question is embedded, the closest destination summaries are pulled from a
//! similarity search index, and a chat model answers grounded on them.
//!
//! ```no_run
//! # async fn run() -> offbeat_rag::Result<()> {
//! use offbeat_rag::{RagConfig, RagPipeline};
//!
//! let config = RagConfig::load(None)?;
//! let pipeline = RagPipeline::from_config(&config)?;
//! let answer = pipeline.answer("offbeat places near Manali").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::{EmptyContextPolicy, RagConfig};
pub use error::{Error, ErrorKind, Result};
pub use pipeline::{Collaborators, PipelineOptions, RagPipeline};
pub use types::{Completion, Query, QueryRequest, QueryResponse, RetrievedPassage};
