//! LLM access for prompt optimization and simulation
//!
//! Talks to any OpenAI-compatible chat completions endpoint (Ollama,
//! OpenAI, vLLM). The optimizer rewrites raw prompts under the CO-STAR
//! system prompt; simulation runs a prompt verbatim as a user message.

pub mod client;
pub mod prompts;

pub use client::ChatMessage;
pub use client::LlmService;
pub use prompts::OPTIMIZER_SYSTEM_PROMPT;
