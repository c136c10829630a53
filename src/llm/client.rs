//! OpenAI-compatible chat completions client

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::PromptRagError;
use crate::errors::Result;
use crate::llm::prompts::OPTIMIZER_SYSTEM_PROMPT;

/// One message of a chat exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Client for an OpenAI-compatible chat completions endpoint
pub struct LlmService {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl LlmService {
    /// Create a new LLM service from the application config
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PromptRagError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.llm_endpoint().trim_end_matches('/').to_string(),
            api_key: config.llm_key().to_string(),
            model: config.llm_model().to_string(),
        })
    }

    /// Model used when a request does not name one
    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.model
    }

    /// Rewrite a raw prompt under the optimizer system prompt
    pub async fn optimize(&self, prompt: &str, model: Option<&str>) -> Result<String> {
        let messages = vec![
            ChatMessage::system(OPTIMIZER_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];
        self.chat(messages, model).await
    }

    /// Run a prompt verbatim as a single user message
    pub async fn complete(&self, prompt: &str, model: Option<&str>) -> Result<String> {
        self.chat(vec![ChatMessage::user(prompt)], model).await
    }

    /// Send a chat completion request and return the first choice's content
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication failures)
    /// - Invalid API responses (malformed JSON, empty choices)
    pub async fn chat(&self, messages: Vec<ChatMessage>, model: Option<&str>) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: Option<String>,
        }

        let model = model.unwrap_or(&self.model);
        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {} (model: {})", url, model);

        let request = ChatRequest {
            model,
            messages: &messages,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PromptRagError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PromptRagError::LlmError(format!(
                "Chat completions error ({status}): {error_text}"
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| PromptRagError::LlmError(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PromptRagError::LlmError("No content in response".to_string()))
    }
}
