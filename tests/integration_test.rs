use std::io::Write;
use std::sync::Arc;

use promptrag::corpus;
use promptrag::corpus::PromptRecord;
use promptrag::embeddings::Embedder;
use promptrag::index::IndexBuilder;
use promptrag::index::IndexPaths;
use promptrag::index::IndexSnapshot;
use promptrag::retrieval::Retriever;
use promptrag::AppConfig;
use promptrag::Result;

fn seed_corpus_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "act,prompt").unwrap();
    writeln!(
        file,
        "Linux Terminal,\"I want you to act as a linux terminal. I will type commands and you will reply with what the terminal should show.\""
    )
    .unwrap();
    writeln!(
        file,
        "English Translator,\"I want you to act as an English translator, spelling corrector and improver.\""
    )
    .unwrap();
    writeln!(
        file,
        "Chef,\"I require someone who can suggest delicious recipes that include foods which are nutritionally beneficial.\""
    )
    .unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_corpus_to_retrieval_flow() -> Result<()> {
    let csv = seed_corpus_csv();
    let records = corpus::load_corpus(csv.path())?;
    assert_eq!(records.len(), 3);

    let dir = tempfile::tempdir()?;
    let paths = IndexPaths::new(dir.path(), "golden_prompts");

    let embedder = Arc::new(Embedder::hashed(48));
    let builder = IndexBuilder::new(Arc::clone(&embedder));
    builder.build_and_save(records, &paths).await?;

    let snapshot = Arc::new(IndexSnapshot::load(&paths)?);
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.manifest().model, "hashed-sha256");

    let retriever = Retriever::new(embedder, Some(snapshot));
    let scored = retriever
        .retrieve_scored(
            "I require someone who can suggest delicious recipes that include foods which are nutritionally beneficial.",
            2,
        )
        .await?;

    assert_eq!(scored.len(), 2);
    assert_eq!(scored[0].record.persona, "Chef");
    assert_eq!(scored[0].position, 2);
    assert!(scored[0].distance.abs() < 1e-6);
    assert!(scored[1].distance >= scored[0].distance);

    Ok(())
}

#[tokio::test]
async fn test_retrieve_similar_strips_scores() -> Result<()> {
    let csv = seed_corpus_csv();
    let records = corpus::load_corpus(csv.path())?;

    let embedder = Arc::new(Embedder::hashed(48));
    let builder = IndexBuilder::new(Arc::clone(&embedder));
    let snapshot = Arc::new(builder.build(records).await?);
    let retriever = Retriever::new(embedder, Some(snapshot));

    let similar = retriever.retrieve_similar("translate this sentence", 2).await;
    assert_eq!(similar.len(), 2);
    for record in &similar {
        assert!(!record.persona.is_empty());
        assert!(!record.prompt.is_empty());
    }

    Ok(())
}

#[tokio::test]
async fn test_config_file_drives_artifact_paths() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("config.toml");
    let index_dir = dir.path().join("snapshots");

    let toml_str = format!(
        r#"
[logging]
level = "info"
backtrace = false

[embeddings]
dimension = 32
model = "all-MiniLM-L6-v2"

[index]
dir = "{}"
name = "exemplars"

[corpus]
dataset_url = "https://example.com/prompts.csv"

[llm]
llm_endpoint = "http://localhost:11434/v1"
llm_key = "ollama"
"#,
        index_dir.display()
    );
    std::fs::write(&config_path, toml_str)?;

    let config = AppConfig::from_file(&config_path)?;
    assert_eq!(config.embedding_dimension(), 32);
    assert_eq!(config.index_path(), index_dir.join("exemplars.index"));
    assert_eq!(config.metadata_path(), index_dir.join("exemplars.json"));

    // Build into the configured locations
    let paths = IndexPaths::from_config(&config);
    let embedder = Arc::new(Embedder::hashed(config.embedding_dimension()));
    let builder = IndexBuilder::new(embedder);
    let records = vec![
        PromptRecord::new("Poet", "write beautiful poems about anything"),
        PromptRecord::new("Rapper", "come up with powerful and meaningful lyrics"),
    ];
    builder.build_and_save(records, &paths).await?;

    assert!(config.index_path().exists());
    assert!(config.metadata_path().exists());

    let loaded = IndexSnapshot::load(&paths)?;
    assert_eq!(loaded.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_empty_corpus_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = IndexPaths::new(dir.path(), "empty");

    let embedder = Arc::new(Embedder::hashed(16));
    let builder = IndexBuilder::new(Arc::clone(&embedder));
    builder.build_and_save(Vec::new(), &paths).await?;

    let snapshot = Arc::new(IndexSnapshot::load(&paths)?);
    assert!(snapshot.is_empty());

    let retriever = Retriever::new(embedder, Some(snapshot));
    let scored = retriever.retrieve_scored("anything", 5).await?;
    assert!(scored.is_empty());

    Ok(())
}
