use crate::types::{DetectionError, InferenceError, ModelResult, ProviderFailure};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

/// Service turning a video id or a web page URL into plain text.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Human-readable name for logs
    fn provider_name(&self) -> String;

    /// Plain-text transcript of a YouTube video
    async fn transcript(&self, api_key: &str, video_id: &str) -> Result<String, ProviderFailure>;

    /// Scraped text of a web page
    async fn scrape(&self, api_key: &str, url: &str) -> Result<String, ProviderFailure>;
}

/// A single structured-output chat request.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub system_instruction: String,
    pub user_text: String,
    pub model_id: String,
    pub response_format: Value,
    pub search_enabled: bool,
    pub temperature: f32,
}

/// Structured-inference backend. Returns the message content of the first
/// choice, or `None` when the response carried none.
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    fn adapter_name(&self) -> String;

    async fn complete(
        &self,
        api_key: &str,
        request: &InferenceRequest,
    ) -> Result<Option<String>, InferenceError>;
}

#[derive(Debug, Clone, Default)]
pub struct UploadReceipt {
    pub request_id: Option<String>,
}

/// Finished detection, before it is tagged with the request id.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    pub status: String,
    pub score: Option<f64>,
    pub models: Vec<ModelResult>,
}

#[derive(Debug, Clone)]
pub enum DetectionPoll {
    Pending,
    Complete(DetectionReport),
}

/// Synthetic-media detection service working on uploaded files.
#[async_trait]
pub trait DetectionProvider: Send + Sync {
    fn provider_name(&self) -> String;

    async fn upload(&self, api_key: &str, file_path: &Path) -> Result<UploadReceipt, DetectionError>;

    /// One status check for `request_id`. Polling is driven by the caller.
    async fn fetch_result(&self, api_key: &str, request_id: &str) -> Result<DetectionPoll, DetectionError>;
}
