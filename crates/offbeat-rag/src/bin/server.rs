//! Travel advisor server binary
//!
//! Run with: cargo run -p offbeat-rag --bin offbeat-rag-server

use offbeat_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "offbeat_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                 Offbeat India Travel Advisor              ║
║          Grounded answers about hidden destinations       ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = RagConfig::load(None)?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {} ({} dims)", config.embeddings.model, config.embeddings.dimensions);
    tracing::info!("  - Search backend: {:?}, index: {}", config.search.backend, config.search.index);
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Top K: {}", config.pipeline.top_k);

    let server = RagServer::new(config)?;

    let collaborators = server.state().pipeline().collaborators();
    for (role, healthy) in [
        ("Encoder", collaborators.encoder.health_check().await),
        ("Search store", collaborators.store.health_check().await),
        ("Generator", collaborators.generator.health_check().await),
    ] {
        match healthy {
            Ok(true) => tracing::info!("{} is reachable", role),
            _ => tracing::warn!("{} is not reachable; queries will fail until it is", role),
        }
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/query - Ask a travel question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
