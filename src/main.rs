use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use clap::Subcommand;
use promptrag::config::AppConfig;
use promptrag::corpus;
use promptrag::embeddings::Embedder;
use promptrag::index::IndexBuilder;
use promptrag::index::IndexPaths;
use promptrag::index::IndexSnapshot;
use promptrag::retrieval::Retriever;
use promptrag::Result;
use tracing::info;

#[derive(Parser)]
#[command(name = "promptrag")]
#[command(about = "PromptRAG CLI for corpus seeding, index builds, and the optimization API")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the exemplar prompt corpus and build the index
    Seed {
        /// Re-download the corpus even if the local file exists
        #[arg(long)]
        force: bool,
    },
    /// Build the index from the local corpus file
    Build,
    /// Search the index for prompts similar to a query
    Query {
        /// Query text
        query: String,
        /// Number of exemplars to return
        #[arg(short = 'k', long, default_value = "3")]
        top_k: usize,
    },
    /// Start the optimization API server
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,
        /// Enable permissive CORS headers
        #[arg(long)]
        cors: bool,
    },
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        promptrag::logging::init_logging_with_level("debug")?;
    } else {
        promptrag::logging::init_logging()?;
    }

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Seed { force } => {
            handle_seed_command(&config, force).await?;
        }
        Commands::Build => {
            handle_build_command(&config).await?;
        }
        Commands::Query { query, top_k } => {
            handle_query_command(&config, &query, top_k).await?;
        }
        Commands::Serve { host, port, cors } => {
            promptrag::api::serve_api(&config, host, port, cors).await?;
        }
        Commands::Config => {
            handle_config_command(&config).await?;
        }
    }

    Ok(())
}

async fn handle_seed_command(config: &AppConfig, force: bool) -> Result<()> {
    let corpus_file = Path::new(config.corpus_file());

    if corpus_file.exists() && !force {
        println!(
            "📦 Corpus file already present: {} (use --force to re-download)",
            corpus_file.display()
        );
    } else {
        println!("⬇️  Downloading corpus from: {}", config.dataset_url());
        corpus::download_dataset(config.dataset_url(), corpus_file).await?;
        println!("✅ Corpus saved to: {}", corpus_file.display());
    }

    handle_build_command(config).await
}

async fn handle_build_command(config: &AppConfig) -> Result<()> {
    let records = corpus::load_corpus(config.corpus_file())?;
    println!("📚 Loaded {} prompt records", records.len());

    let embedder = Arc::new(Embedder::new(config));
    let builder = IndexBuilder::new(embedder);
    let paths = IndexPaths::from_config(config);

    println!("🧠 Embedding corpus with model: {}", config.embedding_model());
    let snapshot = builder.build_and_save(records, &paths).await?;

    println!(
        "✅ Built index {} with {} vectors",
        snapshot.manifest().build_id,
        snapshot.len()
    );
    println!("   Vector artifact:   {}", paths.index.display());
    println!("   Metadata artifact: {}", paths.metadata.display());
    Ok(())
}

async fn handle_query_command(config: &AppConfig, query: &str, top_k: usize) -> Result<()> {
    let paths = IndexPaths::from_config(config);
    let snapshot = Arc::new(IndexSnapshot::load(&paths)?);

    if snapshot.manifest().model != config.embedding_model() {
        println!(
            "⚠️  Index was built with model '{}' but config names '{}'",
            snapshot.manifest().model,
            config.embedding_model()
        );
    }

    let embedder = Arc::new(Embedder::new(config));
    let retriever = Retriever::new(embedder, Some(snapshot));

    let scored = retriever.retrieve_scored(query, top_k).await?;
    if scored.is_empty() {
        println!("No similar prompts found.");
        return Ok(());
    }

    println!("🔎 Top {} exemplars for: {}", scored.len(), query);
    println!();
    for (rank, hit) in scored.iter().enumerate() {
        println!(
            "{}. {} (position {}, distance {:.4})",
            rank + 1,
            hit.record.persona,
            hit.position,
            hit.distance
        );
        println!("   {}", preview(&hit.record.prompt, 120));
        println!();
    }
    Ok(())
}

async fn handle_config_command(config: &AppConfig) -> Result<()> {
    println!("📋 PromptRAG Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("🧠 Embeddings:");
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!("  Cache dir: {}", config.embedding_cache_dir());
    println!();

    println!("🗂️  Index:");
    println!("  Vector artifact:   {}", config.index_path().display());
    println!("  Metadata artifact: {}", config.metadata_path().display());
    println!();

    println!("📚 Corpus:");
    println!("  Dataset URL: {}", config.dataset_url());
    println!("  Local file:  {}", config.corpus_file());
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());

    Ok(())
}

/// Render a single-line preview of a prompt, truncated to `max_chars`.
fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let truncated: String = flat.chars().take(max_chars).collect();
    format!("{truncated}...")
}
