// Tavily web search client (HTTP direct, no SDK)

use crate::error::EvalError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const TAVILY_API_BASE: &str = "https://api.tavily.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Web search seam, so the pipeline can be exercised without the network
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<SearchResult>, EvalError>;
}

pub struct TavilyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, EvalError> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| EvalError::Search(format!("Invalid API key format: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| EvalError::Search(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: TAVILY_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    /// Run one search query
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<SearchResult>, EvalError> {
        let payload = serde_json::json!({
            "query": query,
            "max_results": max_results,
            "topic": "general",
        });

        tracing::debug!(%query, "Sending search request");

        let response = self
            .http_client
            .post(format!("{}/search", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| EvalError::Search(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvalError::Search(format!(
                "Tavily API error ({}): {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| EvalError::Search(e.to_string()))?;

        Ok(Self::parse_results(&body))
    }
}

impl TavilyClient {
    fn parse_results(body: &Value) -> Vec<SearchResult> {
        body["results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .map(|r| SearchResult {
                        title: r["title"].as_str().unwrap_or_default().to_string(),
                        url: r["url"].as_str().unwrap_or_default().to_string(),
                        content: r["content"].as_str().unwrap_or_default().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Join search results into a prompt-ready context block
pub fn context_block(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "(no external context found)".to_string();
    }
    results
        .iter()
        .map(|r| format!("- {} ({}): {}", r.title, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_result_array() {
        let body = serde_json::json!({
            "results": [
                {"title": "One", "url": "https://a", "content": "first"},
                {"title": "Two", "url": "https://b", "content": "second"}
            ]
        });
        let results = TavilyClient::parse_results(&body);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "One");
        assert_eq!(results[1].content, "second");
    }

    #[test]
    fn missing_results_yield_empty() {
        let results = TavilyClient::parse_results(&serde_json::json!({}));
        assert!(results.is_empty());
    }

    #[test]
    fn context_block_formats_lines() {
        let results = vec![SearchResult {
            title: "One".into(),
            url: "https://a".into(),
            content: "first".into(),
        }];
        let block = context_block(&results);
        assert!(block.contains("One (https://a): first"));
    }

    #[test]
    fn empty_context_has_placeholder() {
        assert!(context_block(&[]).contains("no external context"));
    }
}
