//! Semantic retrieval over the prompt index
//!
//! The retriever embeds a query, searches the index snapshot, and joins
//! each hit back to its prompt record by position. It serves the
//! optimization flow, where a missing index or a failing lookup must
//! degrade to "no exemplars" rather than fail the whole request.

pub mod retriever;

pub use retriever::Retriever;

use crate::corpus::PromptRecord;

/// Default number of exemplar prompts fetched for a query
pub const DEFAULT_TOP_K: usize = 3;

/// A retrieved exemplar with its similarity diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPrompt {
    pub record: PromptRecord,
    /// Position of the matched vector (and its record) in the snapshot
    pub position: usize,
    /// Squared Euclidean distance between query and exemplar
    pub distance: f32,
}
