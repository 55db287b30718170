use crate::traits::ExtractionProvider;
use crate::types::{ExtractionSettings, ProviderFailure, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Supadata transcript and web scrape API.
pub struct SupadataProvider {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

impl SupadataProvider {
    pub fn new(settings: &ExtractionSettings, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(settings.timeout)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_content(&self, api_key: &str, path: &str, query: &[(&str, &str)]) -> std::result::Result<String, ProviderFailure> {
        let url = format!("{}/{}", self.endpoint, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .header("x-api-key", api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderFailure::new(None, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderFailure::new(Some(status.as_u16()), e.to_string()))?;

        // 206 is how the provider reports a video without a transcript.
        if status == StatusCode::PARTIAL_CONTENT || !status.is_success() {
            return Err(ProviderFailure::new(Some(status.as_u16()), error_message(&body, status)));
        }

        let payload: ContentResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::new(None, format!("unexpected response body: {}", e)))?;
        Ok(payload.content.map(content_text).unwrap_or_default())
    }
}

/// Plain text of a `content` field: either a string or a list of transcript chunks.
fn content_text(content: Value) -> String {
    match content {
        Value::String(text) => text,
        Value::Array(chunks) => chunks
            .iter()
            .filter_map(|chunk| chunk.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

fn error_message(body: &str, status: StatusCode) -> String {
    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.details)
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), status.canonical_reason().unwrap_or("Unknown")))
}

#[async_trait]
impl ExtractionProvider for SupadataProvider {
    fn provider_name(&self) -> String {
        "Supadata".to_string()
    }

    async fn transcript(&self, api_key: &str, video_id: &str) -> std::result::Result<String, ProviderFailure> {
        self.fetch_content(api_key, "youtube/transcript", &[("videoId", video_id), ("text", "true")])
            .await
    }

    async fn scrape(&self, api_key: &str, url: &str) -> std::result::Result<String, ProviderFailure> {
        self.fetch_content(api_key, "web/scrape", &[("url", url)]).await
    }
}
