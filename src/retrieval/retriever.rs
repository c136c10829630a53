//! Query-time retrieval of similar exemplar prompts

use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use crate::corpus::PromptRecord;
use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::index::IndexSnapshot;
use crate::retrieval::ScoredPrompt;

/// Retriever over an optional index snapshot
///
/// Constructed without a snapshot, every query resolves to an empty
/// result. The snapshot is immutable once attached; rebuilding the index
/// means constructing a new retriever.
pub struct Retriever {
    embedder: Arc<Embedder>,
    snapshot: Option<Arc<IndexSnapshot>>,
}

impl Retriever {
    /// Create a retriever over a loaded snapshot
    pub fn new(embedder: Arc<Embedder>, snapshot: Option<Arc<IndexSnapshot>>) -> Self {
        Self { embedder, snapshot }
    }

    /// Create a retriever with no index attached
    pub fn without_snapshot(embedder: Arc<Embedder>) -> Self {
        Self {
            embedder,
            snapshot: None,
        }
    }

    /// Whether an index snapshot is attached
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.snapshot.is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<IndexSnapshot>> {
        self.snapshot.as_ref()
    }

    /// The `k` exemplars most similar to `query`, with positions and distances
    pub async fn retrieve_scored(&self, query: &str, k: usize) -> Result<Vec<ScoredPrompt>> {
        let Some(snapshot) = &self.snapshot else {
            debug!("No index snapshot attached, returning no exemplars");
            return Ok(Vec::new());
        };

        if k == 0 || snapshot.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Retrieving {} exemplars for query", k);
        let query_vector = self.embedder.embed(query).await?;
        let hits = snapshot.index().search(&query_vector, k)?;

        let mut scored = Vec::with_capacity(hits.len());
        for hit in hits {
            match snapshot.record(hit.position) {
                Some(record) => scored.push(ScoredPrompt {
                    record: record.clone(),
                    position: hit.position,
                    distance: hit.distance,
                }),
                None => {
                    warn!(
                        "Search returned position {} outside the record set, skipping",
                        hit.position
                    );
                }
            }
        }

        Ok(scored)
    }

    /// The `k` most similar exemplar records, for prompt assembly
    ///
    /// Retrieval failures are logged and degrade to an empty list; the
    /// caller's request proceeds without exemplars.
    pub async fn retrieve_similar(&self, query: &str, k: usize) -> Vec<PromptRecord> {
        match self.retrieve_scored(query, k).await {
            Ok(scored) => scored.into_iter().map(|s| s.record).collect(),
            Err(e) => {
                warn!("Similar prompt retrieval failed: {}", e);
                Vec::new()
            }
        }
    }
}
