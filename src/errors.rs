use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptRagError {
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Corrupt index artifacts: {0}")]
    CorruptIndex(String),

    #[error("Index build aborted: {0}")]
    BuildAborted(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Index encoding error: {0}")]
    IndexEncoding(#[from] bincode::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PromptRagError>;
