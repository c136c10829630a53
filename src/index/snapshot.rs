//! Persisted index artifacts and their load-time validation
//!
//! A snapshot is stored as two co-located files sharing a name prefix:
//! `<name>.index` holds the vector buffer (bincode) and `<name>.json`
//! holds the build manifest plus the prompt records (JSON). Both carry
//! the build id of the run that produced them; loading cross-checks the
//! ids, the dimensions, and the record/vector counts so a mismatched or
//! damaged pair is rejected instead of served.

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::vector::VectorIndex;
use crate::corpus::PromptRecord;
use crate::errors::PromptRagError;
use crate::errors::Result;

/// Locations of the two artifacts of one snapshot
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub index: PathBuf,
    pub metadata: PathBuf,
}

impl IndexPaths {
    /// Derive the artifact paths for `<dir>/<name>.index` and `<dir>/<name>.json`
    pub fn new<P: AsRef<Path>>(dir: P, name: &str) -> Self {
        Self {
            index: dir.as_ref().join(format!("{name}.index")),
            metadata: dir.as_ref().join(format!("{name}.json")),
        }
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        Self {
            index: config.index_path(),
            metadata: config.metadata_path(),
        }
    }

    /// Whether both artifacts are present on disk
    #[must_use]
    pub fn exists(&self) -> bool {
        self.index.exists() && self.metadata.exists()
    }
}

/// Provenance of a build, stored in the metadata artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    pub build_id: Uuid,
    pub built_at: DateTime<Utc>,
    pub model: String,
    pub dimension: usize,
}

#[derive(Serialize)]
struct VectorArtifactRef<'a> {
    build_id: Uuid,
    dimension: usize,
    data: &'a [f32],
}

#[derive(Deserialize)]
struct VectorArtifact {
    build_id: Uuid,
    dimension: usize,
    data: Vec<f32>,
}

#[derive(Serialize)]
struct MetadataArtifactRef<'a> {
    #[serde(flatten)]
    manifest: &'a BuildManifest,
    records: &'a [PromptRecord],
}

#[derive(Deserialize)]
struct MetadataArtifact {
    #[serde(flatten)]
    manifest: BuildManifest,
    records: Vec<PromptRecord>,
}

/// A built index together with the records its positions refer to
///
/// The record at position `i` owns the vector at position `i`; the two
/// collections always have the same length.
#[derive(Debug, PartialEq)]
pub struct IndexSnapshot {
    manifest: BuildManifest,
    index: VectorIndex,
    records: Vec<PromptRecord>,
}

impl IndexSnapshot {
    /// Assemble a freshly built snapshot, minting a new build id
    pub fn new(
        index: VectorIndex,
        records: Vec<PromptRecord>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let manifest = BuildManifest {
            build_id: Uuid::new_v4(),
            built_at: Utc::now(),
            model: model.into(),
            dimension: index.dimension(),
        };
        Self::from_parts(manifest, index, records)
    }

    /// Assemble a snapshot from already-validated parts
    pub fn from_parts(
        manifest: BuildManifest,
        index: VectorIndex,
        records: Vec<PromptRecord>,
    ) -> Result<Self> {
        if index.len() != records.len() {
            return Err(PromptRagError::CorruptIndex(format!(
                "metadata lists {} records but the index holds {} vectors",
                records.len(),
                index.len()
            )));
        }
        if index.dimension() != manifest.dimension {
            return Err(PromptRagError::CorruptIndex(format!(
                "index dimension {} does not match manifest dimension {}",
                index.dimension(),
                manifest.dimension
            )));
        }
        Ok(Self {
            manifest,
            index,
            records,
        })
    }

    /// Write both artifacts, replacing any existing pair atomically
    ///
    /// Each artifact is written to a temporary file in the destination
    /// directory and renamed into place. Both payloads are serialized
    /// before either rename, so a serialization failure cannot leave a
    /// half-replaced pair behind.
    pub fn save(&self, paths: &IndexPaths) -> Result<()> {
        let vector_bytes = bincode::serialize(&VectorArtifactRef {
            build_id: self.manifest.build_id,
            dimension: self.index.dimension(),
            data: self.index.data(),
        })?;
        let metadata_bytes = serde_json::to_vec_pretty(&MetadataArtifactRef {
            manifest: &self.manifest,
            records: &self.records,
        })?;

        let index_tmp = write_temp(&paths.index, &vector_bytes)?;
        let metadata_tmp = write_temp(&paths.metadata, &metadata_bytes)?;

        index_tmp
            .persist(&paths.index)
            .map_err(|e| PromptRagError::Io(e.error))?;
        metadata_tmp
            .persist(&paths.metadata)
            .map_err(|e| PromptRagError::Io(e.error))?;

        info!(
            "Saved index snapshot {} ({} vectors) to {}",
            self.manifest.build_id,
            self.len(),
            paths.index.display()
        );
        Ok(())
    }

    /// Load and validate a persisted artifact pair
    pub fn load(paths: &IndexPaths) -> Result<Self> {
        let vector_bytes = std::fs::read(&paths.index)?;
        let vector_artifact: VectorArtifact = bincode::deserialize(&vector_bytes).map_err(|e| {
            PromptRagError::CorruptIndex(format!("vector artifact is not decodable: {e}"))
        })?;

        let metadata_bytes = std::fs::read(&paths.metadata)?;
        let metadata: MetadataArtifact = serde_json::from_slice(&metadata_bytes).map_err(|e| {
            PromptRagError::CorruptIndex(format!("metadata artifact is not decodable: {e}"))
        })?;

        if vector_artifact.build_id != metadata.manifest.build_id {
            return Err(PromptRagError::CorruptIndex(format!(
                "artifacts belong to different builds: index {}, metadata {}",
                vector_artifact.build_id, metadata.manifest.build_id
            )));
        }
        if vector_artifact.dimension != metadata.manifest.dimension {
            return Err(PromptRagError::CorruptIndex(format!(
                "artifact dimensions disagree: index {}, metadata {}",
                vector_artifact.dimension, metadata.manifest.dimension
            )));
        }

        let index = VectorIndex::from_parts(vector_artifact.dimension, vector_artifact.data)?;
        let snapshot = Self::from_parts(metadata.manifest, index, metadata.records)?;

        info!(
            "Loaded index snapshot {} ({} prompt records) from {}",
            snapshot.manifest.build_id,
            snapshot.len(),
            paths.index.display()
        );
        Ok(snapshot)
    }

    #[must_use]
    pub const fn manifest(&self) -> &BuildManifest {
        &self.manifest
    }

    #[must_use]
    pub const fn index(&self) -> &VectorIndex {
        &self.index
    }

    #[must_use]
    pub fn records(&self) -> &[PromptRecord] {
        &self.records
    }

    /// The record that owns the vector at `position`, if any
    #[must_use]
    pub fn record(&self, position: usize) -> Option<&PromptRecord> {
        self.records.get(position)
    }

    /// Number of record/vector pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn write_temp(dest: &Path, bytes: &[u8]) -> Result<tempfile::NamedTempFile> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> IndexSnapshot {
        let mut index = VectorIndex::new(2);
        index.push(&[1.0, 0.0]).unwrap();
        index.push(&[0.0, 1.0]).unwrap();

        let records = vec![
            PromptRecord::new("Linux Terminal", "act as a linux terminal"),
            PromptRecord::new("Chef", "suggest delicious recipes"),
        ];

        IndexSnapshot::new(index, records, "test-model").unwrap()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let paths = IndexPaths::new(dir.path(), "golden_prompts");

        let snapshot = sample_snapshot();
        assert!(!paths.exists());
        snapshot.save(&paths).unwrap();
        assert!(paths.exists());

        let loaded = IndexSnapshot::load(&paths).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_record_count_mismatch_is_corrupt() {
        let mut index = VectorIndex::new(2);
        index.push(&[1.0, 0.0]).unwrap();
        index.push(&[0.0, 1.0]).unwrap();

        let records = vec![
            PromptRecord::new("A", "a"),
            PromptRecord::new("B", "b"),
            PromptRecord::new("C", "c"),
        ];

        let err = IndexSnapshot::new(index, records, "test-model").unwrap_err();
        match err {
            PromptRagError::CorruptIndex(msg) => {
                assert!(msg.contains("3 records"));
                assert!(msg.contains("2 vectors"));
            }
            other => panic!("expected CorruptIndex, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_generation_pair_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let paths_a = IndexPaths::new(dir.path(), "build_a");
        let paths_b = IndexPaths::new(dir.path(), "build_b");

        sample_snapshot().save(&paths_a).unwrap();
        sample_snapshot().save(&paths_b).unwrap();

        // Same shape on both sides, but the build ids differ
        let mixed = IndexPaths {
            index: paths_a.index,
            metadata: paths_b.metadata,
        };
        let err = IndexSnapshot::load(&mixed).unwrap_err();
        match err {
            PromptRagError::CorruptIndex(msg) => {
                assert!(msg.contains("different builds"));
            }
            other => panic!("expected CorruptIndex, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_vector_artifact_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let paths = IndexPaths::new(dir.path(), "golden_prompts");
        sample_snapshot().save(&paths).unwrap();

        let bytes = std::fs::read(&paths.index).unwrap();
        std::fs::write(&paths.index, &bytes[..bytes.len() / 2]).unwrap();

        let err = IndexSnapshot::load(&paths).unwrap_err();
        assert!(matches!(err, PromptRagError::CorruptIndex(_)));
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = IndexPaths::new(dir.path(), "absent");

        let err = IndexSnapshot::load(&paths).unwrap_err();
        assert!(matches!(err, PromptRagError::Io(_)));
    }

    #[test]
    fn test_positional_lookup() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.record(0).unwrap().persona, "Linux Terminal");
        assert_eq!(snapshot.record(1).unwrap().persona, "Chef");
        assert!(snapshot.record(2).is_none());
    }
}
