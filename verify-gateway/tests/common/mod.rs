#![allow(dead_code)]

// Scripted provider doubles shared by the integration tests.

use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;
use verify_gateway::{
    Credentials, DetectionError, DetectionPoll, DetectionProvider, DetectionReport, ExtractionProvider,
    GatewayConfig, InferenceError, InferenceRequest, LlmAdapter, ModelResult, ProviderFailure, UploadReceipt,
};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Config with every credential present and short deadlines.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig {
        credentials: Credentials {
            media_detection: Some("rd-test-key".to_string()),
            extraction: Some("supadata-test-key".to_string()),
            inference: Some("xai-test-key".to_string()),
        },
        ..GatewayConfig::default()
    };
    config.inference.timeout = Duration::from_millis(500);
    config.detection.timeout = Duration::from_millis(300);
    config.detection.initial_poll_interval = Duration::from_millis(5);
    config.detection.max_poll_interval = Duration::from_millis(20);
    config
}

pub fn verdict_json(decision: &str, sources: usize) -> String {
    let sources: Vec<String> = (0..sources).map(|i| format!("https://source{}.example.org", i)).collect();
    json!({
        "decision": decision,
        "summary": "The claim is not supported by reliable outlets.",
        "explanation": "Several outlets and an official statement contradict it.",
        "sources": sources,
    })
    .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionCall {
    Transcript { video_id: String },
    Scrape { url: String },
}

pub struct ScriptedExtraction {
    transcript: Result<String, ProviderFailure>,
    scrape: Result<String, ProviderFailure>,
    calls: Mutex<Vec<ExtractionCall>>,
}

impl ScriptedExtraction {
    pub fn new() -> Self {
        Self {
            transcript: Ok("Transcript text about a recent event.".to_string()),
            scrape: Ok("Scraped article text about a recent event.".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_transcript(mut self, outcome: Result<String, ProviderFailure>) -> Self {
        self.transcript = outcome;
        self
    }

    pub fn with_scrape(mut self, outcome: Result<String, ProviderFailure>) -> Self {
        self.scrape = outcome;
        self
    }

    pub fn calls(&self) -> Vec<ExtractionCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionProvider for ScriptedExtraction {
    fn provider_name(&self) -> String {
        "scripted extraction".to_string()
    }

    async fn transcript(&self, _api_key: &str, video_id: &str) -> Result<String, ProviderFailure> {
        self.calls.lock().unwrap().push(ExtractionCall::Transcript {
            video_id: video_id.to_string(),
        });
        self.transcript.clone()
    }

    async fn scrape(&self, _api_key: &str, url: &str) -> Result<String, ProviderFailure> {
        self.calls.lock().unwrap().push(ExtractionCall::Scrape { url: url.to_string() });
        self.scrape.clone()
    }
}

pub struct ScriptedLlm {
    reply: Result<Option<String>, InferenceError>,
    delay: Duration,
    requests: Mutex<Vec<InferenceRequest>>,
}

impl ScriptedLlm {
    pub fn replying(content: impl Into<String>) -> Self {
        Self::with_outcome(Ok(Some(content.into())))
    }

    pub fn with_outcome(reply: Result<Option<String>, InferenceError>) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmAdapter for ScriptedLlm {
    fn adapter_name(&self) -> String {
        "scripted llm".to_string()
    }

    async fn complete(&self, _api_key: &str, request: &InferenceRequest) -> Result<Option<String>, InferenceError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}

pub fn sample_report() -> DetectionReport {
    DetectionReport {
        status: "MANIPULATED".to_string(),
        score: Some(0.87),
        models: vec![
            ModelResult {
                name: "rd-context-img".to_string(),
                status: "MANIPULATED".to_string(),
                score: Some(0.91),
                metadata: json!({ "heatmap": false }),
            },
            ModelResult {
                name: "rd-pine-img".to_string(),
                status: "AUTHENTIC".to_string(),
                score: Some(0.12),
                metadata: serde_json::Value::Null,
            },
            ModelResult {
                name: "rd-oak-img".to_string(),
                status: "NOT_APPLICABLE".to_string(),
                score: None,
                metadata: serde_json::Value::Null,
            },
        ],
    }
}

pub struct ScriptedDetection {
    request_id: Option<String>,
    pending_polls: usize,
    never_completes: bool,
    report: DetectionReport,
    uploads: Mutex<Vec<PathBuf>>,
    upload_existed: Mutex<Vec<bool>>,
    polls: AtomicUsize,
}

impl ScriptedDetection {
    pub fn completing_after(pending_polls: usize) -> Self {
        Self {
            request_id: Some("req-123".to_string()),
            pending_polls,
            never_completes: false,
            report: sample_report(),
            uploads: Mutex::new(Vec::new()),
            upload_existed: Mutex::new(Vec::new()),
            polls: AtomicUsize::new(0),
        }
    }

    pub fn never_completing() -> Self {
        Self {
            never_completes: true,
            ..Self::completing_after(0)
        }
    }

    pub fn with_request_id(mut self, request_id: Option<&str>) -> Self {
        self.request_id = request_id.map(str::to_string);
        self
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }

    /// Whether each uploaded file existed at upload time.
    pub fn upload_existed(&self) -> Vec<bool> {
        self.upload_existed.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetectionProvider for ScriptedDetection {
    fn provider_name(&self) -> String {
        "scripted detection".to_string()
    }

    async fn upload(&self, _api_key: &str, file_path: &Path) -> Result<UploadReceipt, DetectionError> {
        self.uploads.lock().unwrap().push(file_path.to_path_buf());
        self.upload_existed.lock().unwrap().push(file_path.exists());
        Ok(UploadReceipt {
            request_id: self.request_id.clone(),
        })
    }

    async fn fetch_result(&self, _api_key: &str, _request_id: &str) -> Result<DetectionPoll, DetectionError> {
        let seen = self.polls.fetch_add(1, Ordering::SeqCst);
        if self.never_completes || seen < self.pending_polls {
            Ok(DetectionPoll::Pending)
        } else {
            Ok(DetectionPoll::Complete(self.report.clone()))
        }
    }
}

/// One request as seen by a stub provider server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: axum::http::Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: axum::http::HeaderMap,
    pub body: axum::body::Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Clone, Default)]
pub struct RequestLog(std::sync::Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    pub fn record(
        &self,
        method: axum::http::Method,
        uri: &axum::http::Uri,
        headers: axum::http::HeaderMap,
        body: axum::body::Bytes,
    ) {
        let query = url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
            .into_owned()
            .collect();
        self.0.lock().unwrap().push(RecordedRequest {
            method,
            path: uri.path().to_string(),
            query,
            headers,
            body,
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.0.lock().unwrap().clone()
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}", addr)
}
