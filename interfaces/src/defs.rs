use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a caller hands the gateway to verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationInput {
    RawText(String),
    ImageBytes { bytes: Vec<u8>, mime_type: String },
    Url(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Web,
    YouTube,
}

/// Result of classifying a URL.
///
/// `video_id` is only ever set for `SourceKind::YouTube`. A YouTube URL whose
/// identifier could not be read keeps `kind == YouTube` with `video_id == None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedUrl {
    pub kind: SourceKind,
    pub video_id: Option<String>,
}

impl ClassifiedUrl {
    pub fn web() -> Self {
        Self {
            kind: SourceKind::Web,
            video_id: None,
        }
    }

    pub fn youtube(video_id: Option<String>) -> Self {
        Self {
            kind: SourceKind::YouTube,
            video_id,
        }
    }
}

/// Plain text pulled out of a web page or a video transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub text: String,
    pub source_kind: SourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Yes,
    No,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Yes => "yes",
            Decision::No => "no",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "yes" => Some(Decision::Yes),
            "no" => Some(Decision::No),
            _ => None,
        }
    }
}

/// Disinformation assessment in the exact shape of the verdict contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Decision,
    pub summary: String,
    pub explanation: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub name: String,
    pub status: String,
    /// Likelihood of manipulation in 0.0..=1.0, same scale as `DetectionResult::score`.
    pub score: Option<f64>,
    pub metadata: Value,
}

/// Raw outcome of a media detection run. Scores are normalized to 0.0..=1.0
/// but otherwise reported as-is, no thresholding is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub request_id: String,
    pub status: String,
    pub score: Option<f64>,
    pub models: Vec<ModelResult>,
}
