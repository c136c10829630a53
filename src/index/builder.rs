//! Index construction from a prompt corpus

use std::sync::Arc;

use tracing::info;

use super::snapshot::IndexPaths;
use super::snapshot::IndexSnapshot;
use super::vector::VectorIndex;
use crate::corpus::PromptRecord;
use crate::embeddings::Embedder;
use crate::errors::PromptRagError;
use crate::errors::Result;

/// Builds an index snapshot by embedding every record of a corpus
///
/// Records are embedded in corpus order, so the vector at position `i`
/// in the resulting index belongs to record `i`. Any record that fails
/// to embed aborts the whole build; a partially built index is never
/// produced.
pub struct IndexBuilder {
    embedder: Arc<Embedder>,
}

impl IndexBuilder {
    pub fn new(embedder: Arc<Embedder>) -> Self {
        Self { embedder }
    }

    /// Embed all records and assemble a snapshot
    pub async fn build(&self, records: Vec<PromptRecord>) -> Result<IndexSnapshot> {
        if self.embedder.dimension() == 0 {
            return Err(PromptRagError::ConfigError(
                "embedding dimension must be positive".to_string(),
            ));
        }

        info!("Building index for {} prompt records", records.len());

        let texts: Vec<String> = records.iter().map(|r| r.prompt.clone()).collect();
        let vectors = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(into_build_error)?;

        if vectors.len() != records.len() {
            return Err(PromptRagError::BuildAborted(format!(
                "embedded {} of {} records",
                vectors.len(),
                records.len()
            )));
        }

        let mut index = VectorIndex::new(self.embedder.dimension());
        for vector in &vectors {
            index.push(vector)?;
        }

        let snapshot = IndexSnapshot::new(index, records, self.embedder.model())?;
        info!(
            "Built index snapshot {} with {} vectors of dimension {}",
            snapshot.manifest().build_id,
            snapshot.len(),
            snapshot.index().dimension()
        );
        Ok(snapshot)
    }

    /// Build a snapshot and persist its artifact pair
    pub async fn build_and_save(
        &self,
        records: Vec<PromptRecord>,
        paths: &IndexPaths,
    ) -> Result<IndexSnapshot> {
        let snapshot = self.build(records).await?;
        snapshot.save(paths)?;
        Ok(snapshot)
    }
}

/// Missing-model and dimension errors keep their precise variants; any
/// other embedding failure becomes a build abort.
fn into_build_error(err: PromptRagError) -> PromptRagError {
    match err {
        PromptRagError::ModelUnavailable(_) | PromptRagError::DimensionMismatch { .. } => err,
        other => PromptRagError::BuildAborted(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<PromptRecord> {
        vec![
            PromptRecord::new("Linux Terminal", "act as a linux terminal"),
            PromptRecord::new("Chef", "suggest delicious recipes"),
            PromptRecord::new("Travel Guide", "suggest places to visit"),
        ]
    }

    #[tokio::test]
    async fn test_build_preserves_record_order() {
        let embedder = Arc::new(Embedder::hashed(8));
        let builder = IndexBuilder::new(Arc::clone(&embedder));

        let snapshot = builder.build(sample_records()).await.unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.record(0).unwrap().persona, "Linux Terminal");
        assert_eq!(snapshot.record(2).unwrap().persona, "Travel Guide");

        // The vector at each position is the embedding of that record's prompt
        let expected = embedder.embed("suggest delicious recipes").await.unwrap();
        assert_eq!(snapshot.index().vector(1).unwrap(), expected.as_slice());
    }

    #[tokio::test]
    async fn test_build_empty_corpus_yields_empty_snapshot() {
        let builder = IndexBuilder::new(Arc::new(Embedder::hashed(8)));
        let snapshot = builder.build(Vec::new()).await.unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.index().dimension(), 8);
    }

    #[tokio::test]
    async fn test_build_records_model_in_manifest() {
        let builder = IndexBuilder::new(Arc::new(Embedder::hashed(8)));
        let snapshot = builder.build(sample_records()).await.unwrap();
        assert_eq!(snapshot.manifest().model, "hashed-sha256");
        assert_eq!(snapshot.manifest().dimension, 8);
    }

    #[tokio::test]
    async fn test_build_and_save_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = IndexPaths::new(dir.path(), "golden_prompts");

        let builder = IndexBuilder::new(Arc::new(Embedder::hashed(8)));
        builder.build_and_save(sample_records(), &paths).await.unwrap();

        assert!(paths.exists());
        let loaded = IndexSnapshot::load(&paths).unwrap();
        assert_eq!(loaded.len(), 3);
    }

    #[tokio::test]
    async fn test_zero_dimension_rejected() {
        let builder = IndexBuilder::new(Arc::new(Embedder::hashed(0)));
        let err = builder.build(sample_records()).await.unwrap_err();
        assert!(matches!(err, PromptRagError::ConfigError(_)));
    }
}
