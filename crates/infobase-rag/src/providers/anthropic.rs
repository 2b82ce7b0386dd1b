//! Anthropic Messages API client for answer generation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::llm::LlmProvider;
use super::retry::RetryPolicy;
use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// Anthropic client with automatic retry
pub struct AnthropicClient {
    client: Client,
    config: LlmConfig,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl AnthropicClient {
    /// Create a new client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            retry: RetryPolicy::new(config.max_retries),
            config: config.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }
}

/// Join the text blocks of a response
fn response_text(response: MessagesResponse) -> Result<String> {
    let text: String = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect();

    if text.is_empty() {
        return Err(Error::llm("No text in Anthropic response"));
    }
    Ok(text)
}

#[async_trait]
impl LlmProvider for AnthropicClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let url = self.endpoint();

        tracing::debug!("Generating answer with model: {}", self.config.model);

        self.retry
            .run("Anthropic messages request", || {
                let url = url.clone();
                async move {
                    let request = MessagesRequest {
                        model: &self.config.model,
                        max_tokens: self.config.max_tokens,
                        temperature: self.config.temperature,
                        system,
                        messages: vec![Message {
                            role: "user",
                            content: prompt,
                        }],
                    };

                    let response = self
                        .client
                        .post(&url)
                        .header("x-api-key", &self.config.api_key)
                        .header("anthropic-version", &self.config.api_version)
                        .json(&request)
                        .send()
                        .await
                        .map_err(|e| Error::llm(format!("Anthropic request failed: {}", e)))?;

                    if !response.status().is_success() {
                        let status = response.status();
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::api("Anthropic", status.as_u16(), body));
                    }

                    let parsed: MessagesResponse = response.json().await.map_err(|e| {
                        Error::llm(format!("Failed to parse Anthropic response: {}", e))
                    })?;

                    response_text(parsed)
                }
            })
            .await
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = MessagesRequest {
            model: "claude-3-haiku-20240307",
            max_tokens: 256,
            temperature: 0.0,
            system: "Answer briefly.",
            messages: vec![Message {
                role: "user",
                content: "What is measles?",
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["system"], "Answer briefly.");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 256);
    }

    #[test]
    fn test_response_text_skips_other_blocks() {
        let raw = r#"{
            "id": "msg_01",
            "type": "message",
            "content": [
                {"type": "text", "text": "Measles is "},
                {"type": "tool_use", "id": "x", "name": "y", "input": {}},
                {"type": "text", "text": "a viral disease."}
            ]
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response_text(parsed).unwrap(), "Measles is a viral disease.");
    }

    #[test]
    fn test_empty_response_is_error() {
        let parsed: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(response_text(parsed).is_err());
    }
}
