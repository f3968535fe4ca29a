// Google Gemini client (Vertex AI generateContent endpoint)

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Gemini client against the Vertex AI REST surface
///
/// The caller supplies a cloud project, region, and an OAuth access token;
/// the deployment model name is passed per request, mirroring OpenAIClient.
pub struct GeminiClient {
    http_client: reqwest::Client,
    project: String,
    location: String,
}

impl GeminiClient {
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let access_token = access_token.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token))
                .context("Invalid access token format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            project: project.into(),
            location: location.into(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "https://{loc}-aiplatform.googleapis.com/v1/projects/{proj}/locations/{loc}/publishers/google/models/{model}:generateContent",
            loc = self.location,
            proj = self.project,
            model = model,
        )
    }

    /// Build generateContent request payload
    ///
    /// System messages map to systemInstruction; the turn history maps to
    /// contents with user/model roles.
    fn build_generate_request(&self, messages: &[Message], options: &ChatOptions) -> Value {
        let mut system_parts: Vec<Value> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for msg in messages {
            match msg {
                Message::System { content } => {
                    system_parts.push(serde_json::json!({"text": content}));
                }
                Message::Human { content } => {
                    contents.push(serde_json::json!({
                        "role": "user",
                        "parts": [{"text": content}],
                    }));
                }
                Message::AI { content } => {
                    contents.push(serde_json::json!({
                        "role": "model",
                        "parts": [{"text": content}],
                    }));
                }
            }
        }

        let mut request = serde_json::json!({ "contents": contents });
        let obj = request.as_object_mut().unwrap();

        if !system_parts.is_empty() {
            obj.insert(
                "systemInstruction".to_string(),
                serde_json::json!({"parts": system_parts}),
            );
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(temp) = options.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
        }
        if !generation_config.is_empty() {
            obj.insert(
                "generationConfig".to_string(),
                Value::Object(generation_config),
            );
        }

        request
    }

    fn parse_generate_response(&self, body: Value) -> ChatResponse {
        let candidate = &body["candidates"][0];

        let content = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty());

        let finish_reason = candidate["finishReason"].as_str().map(|s| s.to_string());
        let usage = body.get("usageMetadata").map(|u| TokenUsage {
            input_tokens: u["promptTokenCount"].as_u64().unwrap_or(0) as u32,
            output_tokens: u["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
            total_tokens: u["totalTokenCount"].as_u64().unwrap_or(0) as u32,
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
impl ChatClient for GeminiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_generate_request(&request.messages, &request.options);

        tracing::debug!(model = %request.model, "Sending generateContent request");

        let response = self
            .http_client
            .post(self.endpoint(&request.model))
            .json(&payload)
            .send()
            .await
            .context("generateContent request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Vertex AI error ({}): {}", status, body);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse generateContent response")?;

        Ok(self.parse_generate_response(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new("my-project", "us-central1", "test-token").unwrap()
    }

    #[test]
    fn endpoint_embeds_project_and_location() {
        let url = client().endpoint("gemini-2.0-flash-001");
        assert!(url.contains("us-central1-aiplatform.googleapis.com"));
        assert!(url.contains("/projects/my-project/"));
        assert!(url.ends_with("gemini-2.0-flash-001:generateContent"));
    }

    #[test]
    fn system_messages_become_system_instruction() {
        let messages = vec![Message::system("Be terse"), Message::human("Hello")];
        let payload = client().build_generate_request(&messages, &ChatOptions::default());

        assert_eq!(payload["systemInstruction"]["parts"][0]["text"], "Be terse");
        assert_eq!(payload["contents"][0]["role"], "user");
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "Hello");
    }

    #[test]
    fn ai_turns_map_to_model_role() {
        let messages = vec![
            Message::human("Hi"),
            Message::ai("Hello"),
            Message::human("How are you?"),
        ];
        let payload = client().build_generate_request(&messages, &ChatOptions::default());
        assert_eq!(payload["contents"][1]["role"], "model");
    }

    #[test]
    fn parses_candidate_parts() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hel"}, {"text": "lo"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 2, "totalTokenCount": 7}
        });

        let response = client().parse_generate_response(body);
        assert_eq!(response.content.as_deref(), Some("Hello"));
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.unwrap().total_tokens, 7);
    }
}
