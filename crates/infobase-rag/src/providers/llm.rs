//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for chat-completion models
///
/// Implementations:
/// - `AnthropicClient`: Anthropic Messages API
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a single-turn prompt under a system instruction
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model being used
    fn model(&self) -> &str;
}
