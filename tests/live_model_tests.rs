//! Tests that exercise the real sentence embedding model
//!
//! Ignored by default: the first run downloads the model weights into
//! the configured cache directory.

use std::sync::Arc;

use promptrag::corpus::PromptRecord;
use promptrag::embeddings::Embedder;
use promptrag::index::IndexBuilder;
use promptrag::retrieval::Retriever;
use promptrag::AppConfig;
use promptrag::Result;

fn terminal_and_chef() -> Vec<PromptRecord> {
    vec![
        PromptRecord::new(
            "Linux Terminal",
            "I want you to act as a linux terminal. I will type commands and you will reply with what the terminal should show.",
        ),
        PromptRecord::new(
            "Chef",
            "I require someone who can suggest delicious recipes that include foods which are nutritionally beneficial but also easy and not time consuming.",
        ),
    ]
}

#[tokio::test]
#[ignore = "Downloads the embedding model on first run"]
async fn test_real_model_embedding_dimension() -> Result<()> {
    let config = AppConfig::default();
    let embedder = Embedder::new(&config);

    let vector = embedder.embed("hello world").await?;
    assert_eq!(vector.len(), config.embedding_dimension());
    Ok(())
}

#[tokio::test]
#[ignore = "Downloads the embedding model on first run"]
async fn test_real_model_ranks_terminal_query_first() -> Result<()> {
    let config = AppConfig::default();
    let embedder = Arc::new(Embedder::new(&config));
    let builder = IndexBuilder::new(Arc::clone(&embedder));
    let snapshot = Arc::new(builder.build(terminal_and_chef()).await?);
    let retriever = Retriever::new(embedder, Some(snapshot));

    let scored = retriever
        .retrieve_scored("How do I list the files in a shell session?", 2)
        .await?;
    assert_eq!(scored.len(), 2);
    assert_eq!(scored[0].record.persona, "Linux Terminal");
    assert!(scored[0].distance < scored[1].distance);
    Ok(())
}

#[tokio::test]
#[ignore = "Downloads the embedding model on first run"]
async fn test_real_model_ranks_cooking_query_first() -> Result<()> {
    let config = AppConfig::default();
    let embedder = Arc::new(Embedder::new(&config));
    let builder = IndexBuilder::new(Arc::clone(&embedder));
    let snapshot = Arc::new(builder.build(terminal_and_chef()).await?);
    let retriever = Retriever::new(embedder, Some(snapshot));

    let similar = retriever
        .retrieve_similar("What should I cook for a healthy dinner tonight?", 1)
        .await;
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].persona, "Chef");
    Ok(())
}
