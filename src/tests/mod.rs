
use std::sync::Arc;

use crate::corpus::PromptRecord;
use crate::embeddings::Embedder;

/// Test helper to create a small exemplar corpus
pub fn sample_corpus() -> Vec<PromptRecord> {
    vec![
        PromptRecord::new(
            "Linux Terminal",
            "I want you to act as a linux terminal. I will type commands and you will reply with what the terminal should show.",
        ),
        PromptRecord::new(
            "English Translator",
            "I want you to act as an English translator, spelling corrector and improver.",
        ),
        PromptRecord::new(
            "Chef",
            "I require someone who can suggest delicious recipes that include foods which are nutritionally beneficial.",
        ),
        PromptRecord::new(
            "Travel Guide",
            "I want you to act as a travel guide. I will write you my location and you will suggest a place to visit near me.",
        ),
    ]
}

/// Test helper to create a deterministic offline embedder
pub fn test_embedder(dimension: usize) -> Arc<Embedder> {
    Arc::new(Embedder::hashed(dimension))
}
