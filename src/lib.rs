pub mod api;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod errors;
pub mod index;
pub mod llm;
pub mod logging;
pub mod metrics;
pub mod retrieval;

#[cfg(test)]
pub mod tests;

pub use config::AppConfig;
pub use errors::*;
