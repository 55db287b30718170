use crate::traits::{DetectionPoll, DetectionProvider, DetectionReport, UploadReceipt};
use crate::types::{DetectionError, DetectionSettings, ModelResult, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const PENDING_STATUSES: [&str; 2] = ["ANALYZING", "PROCESSING"];

/// Reality Defender media API: presigned upload, then per-request results.
pub struct RealityDefenderProvider {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresignedResponse {
    request_id: Option<String>,
    response: Option<SignedUrl>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedUrl {
    signed_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaResponse {
    results_summary: Option<ResultsSummary>,
    #[serde(default)]
    models: Vec<RawModel>,
}

#[derive(Debug, Deserialize)]
struct ResultsSummary {
    status: String,
    #[serde(default)]
    metadata: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModel {
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: String,
    final_score: Option<f64>,
    #[serde(default)]
    prediction_number: Value,
    metadata: Option<Value>,
    #[serde(default)]
    data: Value,
}

impl RealityDefenderProvider {
    pub fn new(settings: &DetectionSettings, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn failure_text(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        format!("HTTP {}: {}", status.as_u16(), body)
    }
}

/// Scores come back on a 0-100 scale and are reported on 0-1.
fn normalize_score(raw: Option<f64>) -> Option<f64> {
    raw.map(|score| score / 100.0)
}

fn is_pending(status: &str) -> bool {
    PENDING_STATUSES.contains(&status)
}

fn report_status(raw: &str) -> String {
    match raw {
        "FAKE" => "MANIPULATED".to_string(),
        other => other.to_string(),
    }
}

fn model_result(model: RawModel) -> ModelResult {
    let score = normalize_score(model.final_score.or_else(|| model.prediction_number.as_f64()));
    ModelResult {
        name: model.name,
        status: report_status(&model.status),
        score,
        metadata: model.metadata.unwrap_or(model.data),
    }
}

#[async_trait]
impl DetectionProvider for RealityDefenderProvider {
    fn provider_name(&self) -> String {
        "Reality Defender".to_string()
    }

    async fn upload(&self, api_key: &str, file_path: &Path) -> std::result::Result<UploadReceipt, DetectionError> {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let url = format!("{}/api/files/aws-presigned", self.endpoint);
        debug!("POST {} for {}", url, file_name);
        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", api_key)
            .json(&json!({ "fileName": file_name }))
            .send()
            .await
            .map_err(|e| DetectionError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DetectionError::UploadFailed(Self::failure_text(response).await));
        }

        let presigned: PresignedResponse = response
            .json()
            .await
            .map_err(|e| DetectionError::UploadFailed(format!("undecodable presign response: {}", e)))?;

        let signed_url = presigned
            .response
            .and_then(|r| r.signed_url)
            .ok_or_else(|| DetectionError::UploadFailed("presign response carried no signed URL".to_string()))?;

        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| DetectionError::Storage(e.to_string()))?;

        let put = self
            .client
            .put(&signed_url)
            .body(bytes)
            .send()
            .await
            .map_err(|e| DetectionError::UploadFailed(e.to_string()))?;

        if !put.status().is_success() {
            return Err(DetectionError::UploadFailed(Self::failure_text(put).await));
        }

        Ok(UploadReceipt {
            request_id: presigned.request_id,
        })
    }

    async fn fetch_result(&self, api_key: &str, request_id: &str) -> std::result::Result<DetectionPoll, DetectionError> {
        let url = format!("{}/api/media/users/{}", self.endpoint, request_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", api_key)
            .send()
            .await
            .map_err(|e| DetectionError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DetectionError::ProviderError(Self::failure_text(response).await));
        }

        let media: MediaResponse = response
            .json()
            .await
            .map_err(|e| DetectionError::ProviderError(format!("undecodable result: {}", e)))?;

        let summary = match media.results_summary {
            Some(summary) if !is_pending(&summary.status) => summary,
            _ => return Ok(DetectionPoll::Pending),
        };

        Ok(DetectionPoll::Complete(DetectionReport {
            status: report_status(&summary.status),
            score: normalize_score(summary.metadata.get("finalScore").and_then(Value::as_f64)),
            models: media.models.into_iter().map(model_result).collect(),
        }))
    }
}
