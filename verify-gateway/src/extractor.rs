use crate::classifier::classify;
use crate::traits::ExtractionProvider;
use crate::types::{ClassifiedUrl, ExtractedContent, ExtractionError, SourceKind};
use crate::utils::text::preview;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pulls canonical text for a classified URL from the extraction provider.
pub struct ContentExtractor {
    provider: Arc<dyn ExtractionProvider>,
}

impl ContentExtractor {
    pub fn new(provider: Arc<dyn ExtractionProvider>) -> Self {
        Self { provider }
    }

    /// Classify `url` and extract its text.
    pub async fn extract_url(&self, api_key: &str, url: &str) -> Result<ExtractedContent, ExtractionError> {
        let classified = classify(url);
        self.extract(api_key, url, &classified).await
    }

    /// Extract text for an already classified URL.
    ///
    /// A YouTube URL without a video id fails outright; it is never scraped as
    /// a web page instead.
    pub async fn extract(
        &self,
        api_key: &str,
        url: &str,
        classified: &ClassifiedUrl,
    ) -> Result<ExtractedContent, ExtractionError> {
        let outcome = match (classified.kind, classified.video_id.as_deref()) {
            (SourceKind::YouTube, Some(video_id)) => {
                debug!("Requesting transcript for video {} via {}", video_id, self.provider.provider_name());
                self.provider.transcript(api_key, video_id).await
            }
            (SourceKind::YouTube, None) => {
                warn!("YouTube URL without a video id: {}", url);
                return Err(ExtractionError::UnresolvedVideoId { url: url.to_string() });
            }
            (SourceKind::Web, _) => {
                debug!("Requesting page scrape for {} via {}", url, self.provider.provider_name());
                self.provider.scrape(api_key, url).await
            }
        };

        let text = outcome.map_err(|failure| {
            let error = ExtractionError::from_provider(failure);
            warn!("Extraction failed for {}: {}", url, error);
            error
        })?;

        if text.trim().is_empty() {
            warn!("Extraction returned no usable text for {}", url);
            return Err(ExtractionError::Empty);
        }

        info!("Extracted {} chars from {} ({:?}): {}", text.len(), url, classified.kind, preview(&text, 80));
        Ok(ExtractedContent {
            text,
            source_kind: classified.kind,
        })
    }
}
