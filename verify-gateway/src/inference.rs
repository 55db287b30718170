use crate::schema;
use crate::traits::{InferenceRequest, LlmAdapter};
use crate::types::{InferenceError, InferenceSettings};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub const SYSTEM_INSTRUCTION: &str = "You are a journalist who fights disinformation and Russian propaganda. \
Analyse the text below and decide whether it is disinformation or propaganda. \
Base your assessment on information available online: cross-reference popular, credible journalistic \
outlets and official government websites. \
Return the result only as valid JSON that follows the supplied schema.";

/// Message content returned by the inference provider, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInferenceResponse {
    pub content: String,
}

/// Sends text for assessment with the verdict contract attached.
pub struct VerdictInferenceClient {
    adapter: Arc<dyn LlmAdapter>,
    settings: InferenceSettings,
}

impl VerdictInferenceClient {
    pub fn new(adapter: Arc<dyn LlmAdapter>, settings: InferenceSettings) -> Self {
        Self { adapter, settings }
    }

    /// The request sent for `text`: fixed instruction, model, schema and sampling.
    pub fn build_request(&self, text: &str) -> InferenceRequest {
        InferenceRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_text: text.to_string(),
            model_id: self.settings.model_id.clone(),
            response_format: schema::response_format(),
            search_enabled: self.settings.search_enabled,
            temperature: self.settings.temperature,
        }
    }

    /// One structured-output call, bounded by the configured wait.
    pub async fn infer(&self, api_key: &str, text: &str) -> Result<RawInferenceResponse, InferenceError> {
        let request = self.build_request(text);
        debug!(
            "Sending {} chars to {} (model {})",
            text.len(),
            self.adapter.adapter_name(),
            request.model_id
        );

        let content = match timeout(self.settings.timeout, self.adapter.complete(api_key, &request)).await {
            Ok(outcome) => outcome?,
            Err(_) => {
                warn!("Inference exceeded {:?}", self.settings.timeout);
                return Err(InferenceError::Unavailable(format!(
                    "no response within {}s",
                    self.settings.timeout.as_secs()
                )));
            }
        };

        match content {
            Some(content) if !content.trim().is_empty() => {
                info!("Inference returned {} chars", content.len());
                Ok(RawInferenceResponse { content })
            }
            _ => Err(InferenceError::EmptyResponse),
        }
    }
}
