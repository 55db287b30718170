use crate::detection::MediaDetector;
use crate::extractor::ContentExtractor;
use crate::inference::VerdictInferenceClient;
use crate::providers::{RealityDefenderProvider, SupadataProvider, XaiAdapter};
use crate::traits::{DetectionProvider, ExtractionProvider, LlmAdapter};
use crate::types::{DetectionResult, GatewayConfig, GatewayError, Result, VerificationInput, Verdict};
use crate::validator::validate;
use std::sync::Arc;
use tracing::{debug, info};

/// What a verification produced, by input kind.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Verdict(Verdict),
    Detection(DetectionResult),
}

/// Runs the verification stages for one request at a time, strictly in order.
///
/// Holds only read-only state, so one instance can serve concurrent requests.
pub struct VerificationPipeline {
    config: Arc<GatewayConfig>,
    extractor: ContentExtractor,
    inference: VerdictInferenceClient,
    detector: MediaDetector,
}

impl VerificationPipeline {
    /// Pipeline wired to the real providers.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        PipelineBuilder::new(config).build()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub async fn verify(&self, input: VerificationInput) -> Result<VerificationOutcome> {
        match input {
            VerificationInput::RawText(text) => self.verify_text(&text).await.map(VerificationOutcome::Verdict),
            VerificationInput::Url(url) => self.verify_link(&url).await.map(VerificationOutcome::Verdict),
            VerificationInput::ImageBytes { bytes, mime_type } => self
                .verify_media(&bytes, &mime_type)
                .await
                .map(VerificationOutcome::Detection),
        }
    }

    pub async fn verify_text(&self, text: &str) -> Result<Verdict> {
        let inference_key = self.config.credentials.require_inference()?;
        if text.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("text must not be empty".to_string()));
        }

        debug!("Verifying {} chars of raw text", text.len());
        self.assess(inference_key, text).await
    }

    /// Classify, extract, infer, validate. Both credentials are checked before
    /// anything goes over the network.
    pub async fn verify_link(&self, url: &str) -> Result<Verdict> {
        let extraction_key = self.config.credentials.require_extraction()?;
        let inference_key = self.config.credentials.require_inference()?;
        if url.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("url must not be empty".to_string()));
        }

        let content = self.extractor.extract_url(extraction_key, url.trim()).await?;
        debug!("Verifying {} chars extracted from {:?} source", content.text.len(), content.source_kind);
        self.assess(inference_key, &content.text).await
    }

    pub async fn verify_media(&self, bytes: &[u8], mime_type: &str) -> Result<DetectionResult> {
        Ok(self.detector.detect(bytes, mime_type).await?)
    }

    async fn assess(&self, api_key: &str, text: &str) -> Result<Verdict> {
        let raw = self.inference.infer(api_key, text).await?;
        let verdict = validate(&raw.content)?;
        info!("Verdict: decision={} sources={}", verdict.decision.as_str(), verdict.sources.len());
        Ok(verdict)
    }
}

/// Builder for wiring providers; anything not supplied uses the real HTTP client.
pub struct PipelineBuilder {
    config: GatewayConfig,
    extraction: Option<Arc<dyn ExtractionProvider>>,
    llm: Option<Arc<dyn LlmAdapter>>,
    detection: Option<Arc<dyn DetectionProvider>>,
}

impl PipelineBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            extraction: None,
            llm: None,
            detection: None,
        }
    }

    pub fn extraction_provider(mut self, provider: Arc<dyn ExtractionProvider>) -> Self {
        self.extraction = Some(provider);
        self
    }

    pub fn llm_adapter(mut self, adapter: Arc<dyn LlmAdapter>) -> Self {
        self.llm = Some(adapter);
        self
    }

    pub fn detection_provider(mut self, provider: Arc<dyn DetectionProvider>) -> Self {
        self.detection = Some(provider);
        self
    }

    pub fn build(self) -> Result<VerificationPipeline> {
        let config = self.config;
        let extraction: Arc<dyn ExtractionProvider> = match self.extraction {
            Some(provider) => provider,
            None => Arc::new(SupadataProvider::new(&config.extraction, &config.user_agent)?),
        };
        let llm: Arc<dyn LlmAdapter> = match self.llm {
            Some(adapter) => adapter,
            None => Arc::new(XaiAdapter::new(&config.inference, &config.user_agent)?),
        };
        let detection: Arc<dyn DetectionProvider> = match self.detection {
            Some(provider) => provider,
            None => Arc::new(RealityDefenderProvider::new(&config.detection, &config.user_agent)?),
        };

        info!(
            "Pipeline ready: extraction={}, inference={}, detection={}",
            extraction.provider_name(),
            llm.adapter_name(),
            detection.provider_name()
        );

        Ok(VerificationPipeline {
            extractor: ContentExtractor::new(extraction),
            inference: VerdictInferenceClient::new(llm, config.inference.clone()),
            detector: MediaDetector::new(detection, config.credentials.clone(), config.detection.clone()),
            config: Arc::new(config),
        })
    }
}
