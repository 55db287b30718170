use crate::pipeline::VerificationPipeline;
use crate::types::{DetectionResult, GatewayError, Result, Verdict};
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub url: String,
}

type SharedPipeline = Arc<VerificationPipeline>;

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        if status.is_server_error() {
            error!("Request failed with {}: {}", status, self);
        } else {
            warn!("Request rejected with {}: {}", status, self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

// Body rejections use the same `{"detail": ...}` envelope as every other failure.
impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

pub fn router(pipeline: SharedPipeline) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/verify-image", post(verify_image))
        .route("/api/verify-text", post(verify_text))
        .route("/api/verify-link", post(verify_link))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(pipeline)
}

pub async fn serve(bind: SocketAddr, pipeline: SharedPipeline) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(pipeline)).await
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}

async fn verify_text(
    State(pipeline): State<SharedPipeline>,
    payload: std::result::Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<Verdict>> {
    let Json(request) = payload?;
    let span = info_span!("verify_text", request_id = %Uuid::new_v4());
    let verdict = pipeline.verify_text(&request.text).instrument(span).await?;
    Ok(Json(verdict))
}

async fn verify_link(
    State(pipeline): State<SharedPipeline>,
    payload: std::result::Result<Json<LinkRequest>, JsonRejection>,
) -> Result<Json<Verdict>> {
    let Json(request) = payload?;
    let span = info_span!("verify_link", request_id = %Uuid::new_v4(), url = %request.url);
    let verdict = pipeline.verify_link(&request.url).instrument(span).await?;
    Ok(Json(verdict))
}

async fn verify_image(State(pipeline): State<SharedPipeline>, mut multipart: Multipart) -> Result<Json<DetectionResult>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
        upload = Some((bytes, mime_type));
        break;
    }

    let (bytes, mime_type) =
        upload.ok_or_else(|| GatewayError::InvalidRequest("multipart field 'file' is required".to_string()))?;

    let span = info_span!("verify_image", request_id = %Uuid::new_v4(), mime_type = %mime_type);
    let result = pipeline.verify_media(&bytes, &mime_type).instrument(span).await?;
    Ok(Json(result))
}
