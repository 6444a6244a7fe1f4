mod ask;
mod ingest;

use clap::{Parser, Subcommand};

use mbrief_engine::SearchContext;

#[derive(Debug, Parser)]
#[command(name = "mbrief-cli")]
#[command(about = "mbrief market-news command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect the configured source pages and rebuild the vector index.
    Ingest,
    /// Ask a one-shot question against the indexed corpus.
    Ask {
        question: String,
        /// Number of documents to retrieve.
        #[arg(short = 'n', long)]
        results: Option<usize>,
    },
    /// Show the index document count.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = mbrief_core::load_app_config()?;

    match cli.command {
        Commands::Ingest => ingest::run(&config).await,
        Commands::Ask { question, results } => ask::run(&config, &question, results).await,
        Commands::Health => health(&config).await,
    }
}

async fn health(config: &mbrief_core::AppConfig) -> anyhow::Result<()> {
    let ctx = SearchContext::from_config(config).await?;
    let count = ctx.index.count().await?;
    println!("index ok: {count} document(s) in '{}'", config.index_collection);
    Ok(())
}
