use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub use interfaces::defs::{
    ClassifiedUrl, Decision, DetectionResult, ExtractedContent, ModelResult, SourceKind,
    VerificationInput, Verdict,
};

pub const MEDIA_DETECTION_KEY_ENV: &str = "REALITY_DEFENDER_API_KEY";
pub const EXTRACTION_KEY_ENV: &str = "SUPADATA_API_KEY";
pub const INFERENCE_KEY_ENV: &str = "XAI_API_KEY";

/// Provider credentials, read once at start-up. Presence is checked per request.
#[derive(Clone, Default)]
pub struct Credentials {
    pub media_detection: Option<String>,
    pub extraction: Option<String>,
    pub inference: Option<String>,
}

impl Credentials {
    pub fn require_media_detection(&self) -> std::result::Result<&str, ConfigurationError> {
        non_blank(&self.media_detection).ok_or(ConfigurationError::MissingCredential(MEDIA_DETECTION_KEY_ENV))
    }

    pub fn require_extraction(&self) -> std::result::Result<&str, ConfigurationError> {
        non_blank(&self.extraction).ok_or(ConfigurationError::MissingCredential(EXTRACTION_KEY_ENV))
    }

    pub fn require_inference(&self) -> std::result::Result<&str, ConfigurationError> {
        non_blank(&self.inference).ok_or(ConfigurationError::MissingCredential(INFERENCE_KEY_ENV))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// Keys must never end up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "***" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("media_detection", &mask(&self.media_detection))
            .field("extraction", &mask(&self.extraction))
            .field("inference", &mask(&self.inference))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.supadata.ai/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InferenceSettings {
    pub endpoint: String,
    pub model_id: String,
    pub temperature: f32,
    pub search_enabled: bool,
    pub timeout: Duration,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.x.ai/v1".to_string(),
            model_id: "grok-4-fast-reasoning".to_string(),
            temperature: 0.2,
            search_enabled: true,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectionSettings {
    pub endpoint: String,
    pub timeout: Duration,
    pub initial_poll_interval: Duration,
    pub max_poll_interval: Duration,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.prd.realitydefender.xyz".to_string(),
            timeout: Duration::from_secs(90),
            initial_poll_interval: Duration::from_secs(1),
            max_poll_interval: Duration::from_secs(8),
        }
    }
}

/// Read-only process configuration, built once in `main` and shared by reference.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub user_agent: String,
    pub credentials: Credentials,
    pub extraction: ExtractionSettings,
    pub inference: InferenceSettings,
    pub detection: DetectionSettings,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            user_agent: "Verify-Gateway/1.0".to_string(),
            credentials: Credentials::default(),
            extraction: ExtractionSettings::default(),
            inference: InferenceSettings::default(),
            detection: DetectionSettings::default(),
        }
    }
}

/// Failure reported by an extraction provider before it is classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Missing configuration: set {0}")]
    MissingCredential(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaReason {
    Plan,
    Rate,
}

impl fmt::Display for QuotaReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotaReason::Plan => write!(f, "upgrade required, feature not available on the current plan"),
            QuotaReason::Rate => write!(f, "request limit exceeded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Invalid request: the extraction provider rejected the request as malformed")]
    ProviderUnavailable,

    #[error("Unauthorized: check the extraction provider API key")]
    Unauthorized,

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(QuotaReason),

    #[error("Not found: the requested resource does not exist")]
    NotFound,

    #[error("Transcript unavailable: the video has no transcript")]
    TranscriptUnavailable,

    #[error("Could not read a YouTube video id from {url}")]
    UnresolvedVideoId { url: String },

    #[error("Could not extract any content from the given URL")]
    Empty,

    #[error("Extraction provider error: {message}")]
    Unknown { status: Option<u16>, message: String },
}

impl ExtractionError {
    /// Classify a provider failure by its numeric status.
    pub fn from_provider(failure: ProviderFailure) -> Self {
        match failure.status {
            Some(400) => ExtractionError::ProviderUnavailable,
            Some(401) => ExtractionError::Unauthorized,
            Some(402) => ExtractionError::QuotaExceeded(QuotaReason::Plan),
            Some(404) => ExtractionError::NotFound,
            Some(429) => ExtractionError::QuotaExceeded(QuotaReason::Rate),
            Some(206) => ExtractionError::TranscriptUnavailable,
            status => ExtractionError::Unknown {
                status,
                message: failure.message,
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ExtractionError::ProviderUnavailable => 400,
            ExtractionError::Unauthorized => 401,
            ExtractionError::QuotaExceeded(QuotaReason::Plan) => 402,
            ExtractionError::QuotaExceeded(QuotaReason::Rate) => 429,
            ExtractionError::NotFound => 404,
            ExtractionError::TranscriptUnavailable
            | ExtractionError::UnresolvedVideoId { .. }
            | ExtractionError::Empty => 422,
            ExtractionError::Unknown { status: Some(500), .. } => 500,
            ExtractionError::Unknown { .. } => 502,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("Inference provider unavailable: {0}")]
    Unavailable(String),

    #[error("Inference provider error (HTTP {status}): {body}")]
    BadRequest { status: u16, body: String },

    #[error("Empty response from the inference model")]
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Model returned invalid JSON")]
    MalformedJson,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field '{0}' must be a string")]
    InvalidFieldType(&'static str),

    #[error("Field 'decision' must be 'yes' or 'no'")]
    InvalidDecision,

    #[error("Field 'sources' must be a list of strings")]
    SourcesNotList,

    #[error("Field 'sources' has {0} entries (max 10)")]
    TooManySources(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("Unsupported file type: {0} (image/* required)")]
    UnsupportedMedia(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to store the upload: {0}")]
    Storage(String),

    #[error("Upload to the detection provider failed: {0}")]
    UploadFailed(String),

    #[error("Detection provider did not return a request id")]
    NoRequestId,

    #[error("Timed out after {0:?} waiting for the detection result")]
    Timeout(Duration),

    #[error("Detection provider error: {0}")]
    ProviderError(String),
}

impl DetectionError {
    pub fn status_code(&self) -> u16 {
        match self {
            DetectionError::UnsupportedMedia(_) => 415,
            DetectionError::Configuration(_) | DetectionError::Storage(_) => 500,
            DetectionError::Timeout(_) => 504,
            DetectionError::UploadFailed(_)
            | DetectionError::NoRequestId
            | DetectionError::ProviderError(_) => 502,
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl GatewayError {
    /// HTTP status reported to the caller. Every kind maps to exactly one code.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Configuration(_) => 500,
            GatewayError::Extraction(e) => e.status_code(),
            GatewayError::Inference(_) | GatewayError::Validation(_) => 502,
            GatewayError::Detection(e) => e.status_code(),
            GatewayError::InvalidRequest(_) => 422,
            GatewayError::Upstream(_) => 502,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Upstream(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
