//! Text embedding module
//!
//! This module turns prompt text into fixed-dimension vectors using a
//! locally loaded sentence-transformer (all-MiniLM-L6-v2 by default).
//! Model weights are fetched on first use and cached on disk; no network
//! call happens per embedding.
//!
//! # Examples
//!
//! ```rust,no_run
//! use promptrag::config::AppConfig;
//! use promptrag::embeddings::Embedder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let embedder = Embedder::new(&config);
//!
//!     let embedding = embedder.embed("Hello, world!").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod embedder;

pub use embedder::Embedder;

/// Default embedding dimension for all-MiniLM-L6-v2
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Maximum batch size passed to the model per inference call
pub const MAX_BATCH_SIZE: usize = 256;

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    pub cache_dir: String,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        Self {
            model: config.embedding_model().to_string(),
            dimension: config.embedding_dimension(),
            cache_dir: config.embedding_cache_dir().to_string(),
        }
    }
}
