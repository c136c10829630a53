use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub dimension: usize,
    pub model: String,
    /// Directory where downloaded model weights are cached
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

fn default_cache_dir() -> String {
    ".fastembed_cache".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the persisted index artifacts
    pub dir: String,
    /// Shared filename prefix of the vector and metadata artifacts
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub dataset_url: String,
    #[serde(default = "default_corpus_file")]
    pub file: String,
}

fn default_corpus_file() -> String {
    "data/prompts.csv".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub llm_endpoint: String,
    pub llm_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
}

fn default_llm_model() -> String {
    "gemma3:27b".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub embeddings: EmbeddingsConfig,
    pub index: IndexConfig,
    pub corpus: CorpusConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::PromptRagError::Io(e))?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|e| crate::PromptRagError::TomlParsing(e))?;

        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::PromptRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get model weight cache directory
    pub fn embedding_cache_dir(&self) -> &str {
        &self.embeddings.cache_dir
    }

    /// Get index artifact directory
    pub fn index_dir(&self) -> &str {
        &self.index.dir
    }

    /// Get index artifact name prefix
    pub fn index_name(&self) -> &str {
        &self.index.name
    }

    /// Path of the binary vector artifact (`<dir>/<name>.index`)
    pub fn index_path(&self) -> PathBuf {
        Path::new(&self.index.dir).join(format!("{}.index", self.index.name))
    }

    /// Path of the JSON metadata artifact (`<dir>/<name>.json`)
    pub fn metadata_path(&self) -> PathBuf {
        Path::new(&self.index.dir).join(format!("{}.json", self.index.name))
    }

    /// Get corpus dataset URL
    pub fn dataset_url(&self) -> &str {
        &self.corpus.dataset_url
    }

    /// Get local corpus file path
    pub fn corpus_file(&self) -> &str {
        &self.corpus.file
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM key
    pub fn llm_key(&self) -> &str {
        &self.llm.llm_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            embeddings: EmbeddingsConfig {
                dimension: 384,
                model: "all-MiniLM-L6-v2".to_string(),
                cache_dir: default_cache_dir(),
            },
            index: IndexConfig {
                dir: "data".to_string(),
                name: "golden_prompts".to_string(),
            },
            corpus: CorpusConfig {
                dataset_url:
                    "https://raw.githubusercontent.com/f/awesome-chatgpt-prompts/main/prompts.csv"
                        .to_string(),
                file: default_corpus_file(),
            },
            llm: LlmConfig {
                llm_endpoint: "http://localhost:11434/v1".to_string(),
                llm_key: "ollama".to_string(),
                llm_model: "gemma3:27b".to_string(),
            },
        }
    }
}
