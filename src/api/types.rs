//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::corpus::PromptRecord;
use crate::metrics::PromptMetrics;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root service banner
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub index_loaded: bool,
    pub indexed_prompts: usize,
}

/// Prompt optimization request
#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub prompt: String,
    /// Overrides the configured model when set
    #[serde(default)]
    pub model: Option<String>,
}

/// Prompt optimization response
#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub original_metrics: PromptMetrics,
    pub optimized_metrics: PromptMetrics,
    pub similar_prompts: Vec<PromptRecord>,
}

/// Side-by-side simulation request
#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub original_prompt: String,
    pub optimized_prompt: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Side-by-side simulation response
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub original_output: String,
    pub optimized_output: String,
}
