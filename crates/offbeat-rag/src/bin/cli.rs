//! Ask the travel advisor a single question
//!
//! Run with: cargo run -p offbeat-rag --features cli --bin offbeat-rag -- "offbeat places near Manali"

use clap::Parser;
use offbeat_rag::{RagConfig, RagPipeline};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Travel advice for offbeat Indian destinations")]
struct Cli {
    /// The travel question to answer
    question: String,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of passages retrieved
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Also print the passages the answer was grounded on
    #[arg(short, long)]
    sources: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "offbeat_rag=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = RagConfig::load(cli.config.as_deref())?;
    if let Some(top_k) = cli.top_k {
        config.pipeline.top_k = top_k;
    }

    let pipeline = RagPipeline::from_config(&config)?;
    let response = pipeline.answer_detailed(&cli.question).await?;

    println!("{}", response.answer);

    if cli.sources {
        println!();
        for (i, passage) in response.passages.iter().enumerate() {
            println!("[{}] ({:.3}) {}", i + 1, passage.score, passage.text);
        }
    }

    Ok(())
}
