//! Embedding service backed by a local sentence-transformer
//!
//! The model handle is created lazily on first use and at most once; until
//! then constructing an [`Embedder`] is cheap and infallible. A failed
//! weight load surfaces as `ModelUnavailable` to every caller that needed
//! the model, and entry points that must fail fast force the load up front
//! with [`Embedder::preload`]. `TextEmbedding::embed` takes `&mut self`, so
//! the loaded model lives behind a mutex and inference runs on the blocking
//! thread pool.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use fastembed::EmbeddingModel;
use fastembed::InitOptions;
use fastembed::TextEmbedding;
use parking_lot::Mutex;
use sha2::Digest;
use sha2::Sha256;
use tokio::sync::OnceCell;
use tracing::debug;
use tracing::info;

use super::EmbeddingConfig;
use super::MAX_BATCH_SIZE;
use crate::errors::PromptRagError;
use crate::errors::Result;

enum Backend {
    /// Sentence-transformer weights, loaded on first embed
    Model(OnceCell<Arc<Mutex<TextEmbedding>>>),
    /// Deterministic SHA-256 vectors for tests and offline runs
    Hashed,
}

/// Service for turning prompt text into fixed-dimension vectors
pub struct Embedder {
    backend: Backend,
    config: EmbeddingConfig,
    cache: DashMap<String, Vec<f32>>,
}

impl Embedder {
    /// Create an embedder from the application config
    pub fn new(config: &crate::config::AppConfig) -> Self {
        Self::from_config(EmbeddingConfig::from_app_config(config))
    }

    /// Create an embedder from an embedding config
    pub fn from_config(config: EmbeddingConfig) -> Self {
        Self {
            backend: Backend::Model(OnceCell::new()),
            config,
            cache: DashMap::new(),
        }
    }

    /// Create a deterministic hash-based embedder
    ///
    /// Vectors are derived from the SHA-256 digest of the text, so equal
    /// texts always map to equal vectors. No model weights are touched.
    pub fn hashed(dimension: usize) -> Self {
        Self {
            backend: Backend::Hashed,
            config: EmbeddingConfig {
                model: "hashed-sha256".to_string(),
                dimension,
                cache_dir: String::new(),
            },
            cache: DashMap::new(),
        }
    }

    /// Generate an embedding for a single text
    ///
    /// Text that is empty after trimming maps to the all-zeros vector
    /// without touching the model.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| {
            PromptRagError::Embedding("model returned no embedding for input".to_string())
        })
    }

    /// Generate embeddings for multiple texts, preserving input order
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut results: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        let mut pending: Vec<(usize, String)> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            if text.trim().is_empty() {
                debug!("Empty text at position {}, using zero vector", i);
                results[i] = Some(vec![0.0; self.config.dimension]);
            } else if let Some(cached) = self.cache.get(text.as_str()) {
                results[i] = Some(cached.clone());
            } else {
                pending.push((i, text.clone()));
            }
        }

        if !pending.is_empty() {
            let batch: Vec<String> = pending.iter().map(|(_, t)| t.clone()).collect();
            let embeddings = self.run_backend(batch).await?;

            if embeddings.len() != pending.len() {
                return Err(PromptRagError::Embedding(format!(
                    "model returned {} embeddings for {} inputs",
                    embeddings.len(),
                    pending.len()
                )));
            }

            for ((i, text), embedding) in pending.into_iter().zip(embeddings) {
                self.check_dimension(&embedding)?;
                self.cache.insert(text, embedding.clone());
                results[i] = Some(embedding);
            }
        }

        Ok(results.into_iter().flatten().collect())
    }

    /// Get the embedding dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Get the model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the number of cached embeddings
    #[must_use]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Load the model weights now rather than on the first embed
    ///
    /// The server calls this before it starts accepting requests, so an
    /// unloadable model aborts startup as `ModelUnavailable` instead of
    /// failing request by request. The hashed backend has no weights and
    /// always succeeds.
    pub async fn preload(&self) -> Result<()> {
        match &self.backend {
            Backend::Hashed => Ok(()),
            Backend::Model(_) => self.model_handle().await.map(|_| ()),
        }
    }

    async fn run_backend(&self, batch: Vec<String>) -> Result<Vec<Vec<f32>>> {
        match &self.backend {
            Backend::Hashed => Ok(batch.iter().map(|t| self.hash_embed(t)).collect()),
            Backend::Model(_) => {
                let handle = self.model_handle().await?;
                tokio::task::spawn_blocking(move || {
                    let mut model = handle.lock();
                    model
                        .embed(batch, Some(MAX_BATCH_SIZE))
                        .map_err(|e| PromptRagError::Embedding(e.to_string()))
                })
                .await
                .map_err(|e| PromptRagError::Embedding(format!("inference task failed: {e}")))?
            }
        }
    }

    async fn model_handle(&self) -> Result<Arc<Mutex<TextEmbedding>>> {
        let Backend::Model(cell) = &self.backend else {
            return Err(PromptRagError::ModelUnavailable(
                "hashed embedder has no model backend".to_string(),
            ));
        };

        let handle = cell
            .get_or_try_init(|| async {
                let model = resolve_model(&self.config.model)?;
                let cache_dir = PathBuf::from(&self.config.cache_dir);
                info!("Loading embedding model {} (first use)", self.config.model);

                let loaded = tokio::task::spawn_blocking(move || {
                    TextEmbedding::try_new(
                        InitOptions::new(model)
                            .with_cache_dir(cache_dir)
                            .with_show_download_progress(false),
                    )
                })
                .await
                .map_err(|e| {
                    PromptRagError::ModelUnavailable(format!("model load task failed: {e}"))
                })?
                .map_err(|e| PromptRagError::ModelUnavailable(e.to_string()))?;

                info!("Embedding model {} ready", self.config.model);
                Ok::<_, PromptRagError>(Arc::new(Mutex::new(loaded)))
            })
            .await?;

        Ok(Arc::clone(handle))
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.config.dimension {
            return Err(PromptRagError::DimensionMismatch {
                expected: self.config.dimension,
                actual: embedding.len(),
            });
        }
        Ok(())
    }

    fn hash_embed(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.as_bytes());
        let mut vector = vec![0f32; self.config.dimension];
        for (i, v) in vector.iter_mut().enumerate() {
            let byte = f32::from(digest[i % digest.len()]);
            *v = (byte / 255.0) * 2.0 - 1.0;
        }
        vector
    }
}

/// Map a configured model name to a fastembed model
///
/// Accepts both the short name used in config files and the Hugging Face
/// repository form. The supported set here must stay in sync with the
/// comment in `config.example.toml`.
fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    match name {
        "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        "all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" | "BAAI/bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "nomic-embed-text-v1.5" | "nomic-ai/nomic-embed-text-v1.5" => {
            Ok(EmbeddingModel::NomicEmbedTextV15)
        }
        other => Err(PromptRagError::ModelUnavailable(format!(
            "unsupported embedding model: {other}"
        ))),
    }
}
