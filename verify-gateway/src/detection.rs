use crate::traits::{DetectionPoll, DetectionProvider, DetectionReport};
use crate::types::{Credentials, DetectionError, DetectionResult, DetectionSettings};
use crate::utils::media::{is_image_mime, suffix_for};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Uploaded media on disk for the lifetime of one detection call.
///
/// Owns a `NamedTempFile`, which deletes the file on drop however the call ends.
pub struct UploadArtifact {
    file: NamedTempFile,
}

impl UploadArtifact {
    pub async fn create(media: &[u8], mime_type: &str) -> Result<Self, DetectionError> {
        let file = tempfile::Builder::new()
            .prefix("verify-upload-")
            .suffix(suffix_for(mime_type))
            .tempfile()
            .map_err(|e| DetectionError::Storage(e.to_string()))?;

        tokio::fs::write(file.path(), media)
            .await
            .map_err(|e| DetectionError::Storage(e.to_string()))?;

        debug!("Stored {} bytes at {}", media.len(), file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Uploads media to the detection provider and waits for its verdict.
pub struct MediaDetector {
    provider: Arc<dyn DetectionProvider>,
    credentials: Credentials,
    settings: DetectionSettings,
}

impl MediaDetector {
    pub fn new(provider: Arc<dyn DetectionProvider>, credentials: Credentials, settings: DetectionSettings) -> Self {
        Self {
            provider,
            credentials,
            settings,
        }
    }

    pub async fn detect(&self, media: &[u8], mime_type: &str) -> Result<DetectionResult, DetectionError> {
        if !is_image_mime(mime_type) {
            let declared = if mime_type.trim().is_empty() { "none" } else { mime_type };
            return Err(DetectionError::UnsupportedMedia(declared.to_string()));
        }

        let api_key = self.credentials.require_media_detection()?;

        let artifact = UploadArtifact::create(media, mime_type).await?;

        let receipt = self.provider.upload(api_key, artifact.path()).await?;
        let request_id = receipt
            .request_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(DetectionError::NoRequestId)?;
        info!("Uploaded media to {} (request {})", self.provider.provider_name(), request_id);

        let report = match timeout(self.settings.timeout, self.poll_until_complete(api_key, &request_id)).await {
            Ok(outcome) => outcome?,
            Err(_) => {
                warn!("Detection for request {} exceeded {:?}", request_id, self.settings.timeout);
                return Err(DetectionError::Timeout(self.settings.timeout));
            }
        };

        info!(
            "Detection finished for request {}: status={} models={}",
            request_id,
            report.status,
            report.models.len()
        );
        Ok(DetectionResult {
            request_id,
            status: report.status,
            score: report.score,
            models: report.models,
        })
    }

    async fn poll_until_complete(&self, api_key: &str, request_id: &str) -> Result<DetectionReport, DetectionError> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: self.settings.initial_poll_interval,
            initial_interval: self.settings.initial_poll_interval,
            max_interval: self.settings.max_poll_interval,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };

        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            match self.provider.fetch_result(api_key, request_id).await? {
                DetectionPoll::Complete(report) => return Ok(report),
                DetectionPoll::Pending => {
                    let delay = backoff.next_backoff().unwrap_or(self.settings.max_poll_interval);
                    debug!("Request {} still pending (check {}), next check in {:?}", request_id, attempt, delay);
                    tokio::time::sleep(delay.max(Duration::from_millis(1))).await;
                }
            }
        }
    }
}
