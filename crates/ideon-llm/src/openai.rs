// OpenAI-specific client implementation

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// OpenAI client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Override the API base URL (self-hosted gateways, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Value {
        let openai_messages: Vec<Value> = messages
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role(),
                    "content": msg.content(),
                })
            })
            .collect();

        let mut request = serde_json::json!({
            "model": model,
            "messages": openai_messages,
        });

        let obj = request.as_object_mut().unwrap();
        if let Some(temp) = options.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }

        request
    }

    fn parse_chat_response(&self, body: Value) -> ChatResponse {
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string());
        let finish_reason = body["choices"][0]["finish_reason"]
            .as_str()
            .map(|s| s.to_string());
        let usage = body.get("usage").map(|u| TokenUsage {
            input_tokens: u["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: u["completion_tokens"].as_u64().unwrap_or(0) as u32,
            total_tokens: u["total_tokens"].as_u64().unwrap_or(0) as u32,
        });

        ChatResponse {
            content,
            usage,
            finish_reason,
            raw: body,
        }
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(&request.model, &request.messages, &request.options);

        tracing::debug!(model = %request.model, "Sending chat completion request");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, body);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        Ok(self.parse_chat_response(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_payload_includes_messages_and_options() {
        let client = OpenAIClient::new("test-key").unwrap();
        let messages = vec![Message::system("Be terse"), Message::human("Hello")];
        let options = ChatOptions::new().temperature(0.7).max_tokens(256);

        let payload = client.build_chat_request("gpt-4o", &messages, &options);

        assert_eq!(payload["model"], "gpt-4o");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "Hello");
        assert_eq!(payload["temperature"], 0.7);
        assert_eq!(payload["max_tokens"], 256);
    }

    #[test]
    fn chat_payload_omits_unset_options() {
        let client = OpenAIClient::new("test-key").unwrap();
        let payload =
            client.build_chat_request("gpt-4o", &[Message::human("Hi")], &ChatOptions::default());

        assert!(payload.get("temperature").is_none());
        assert!(payload.get("max_tokens").is_none());
    }

    #[test]
    fn parses_completion_body() {
        let client = OpenAIClient::new("test-key").unwrap();
        let body = serde_json::json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Hi there"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        });

        let response = client.parse_chat_response(body);
        assert_eq!(response.content.as_deref(), Some("Hi there"));
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.unwrap().total_tokens, 13);
    }
}
