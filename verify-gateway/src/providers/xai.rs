use crate::traits::{InferenceRequest, LlmAdapter};
use crate::types::{InferenceError, InferenceSettings, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// xAI chat completions with structured output and live search.
pub struct XaiAdapter {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl XaiAdapter {
    pub fn new(settings: &InferenceSettings, user_agent: &str) -> Result<Self> {
        // The overall wait is enforced by the inference client.
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LlmAdapter for XaiAdapter {
    fn adapter_name(&self) -> String {
        "xAI chat completions".to_string()
    }

    async fn complete(
        &self,
        api_key: &str,
        request: &InferenceRequest,
    ) -> std::result::Result<Option<String>, InferenceError> {
        let body = json!({
            "model": request.model_id,
            "messages": [
                { "role": "system", "content": request.system_instruction },
                { "role": "user", "content": request.user_text },
            ],
            "response_format": request.response_format,
            "search_parameters": { "mode": if request.search_enabled { "on" } else { "off" } },
            "temperature": request.temperature,
        });

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::BadRequest {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| InferenceError::Unavailable(format!("undecodable response: {}", e)))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content))
    }
}
