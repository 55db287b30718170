use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use verify_gateway::{
    server, Credentials, GatewayConfig, VerificationPipeline, EXTRACTION_KEY_ENV, INFERENCE_KEY_ENV,
    MEDIA_DETECTION_KEY_ENV,
};

/// Content verification gateway: images, text and links.
#[derive(Parser, Debug)]
#[command(name = "verify-gateway", version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "VERIFY_BIND", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    #[arg(long, env = MEDIA_DETECTION_KEY_ENV, hide_env_values = true)]
    media_detection_key: Option<String>,

    #[arg(long, env = EXTRACTION_KEY_ENV, hide_env_values = true)]
    extraction_key: Option<String>,

    #[arg(long, env = INFERENCE_KEY_ENV, hide_env_values = true)]
    inference_key: Option<String>,

    /// Upper bound on one inference call
    #[arg(long, default_value_t = 60)]
    inference_timeout_secs: u64,

    /// Upper bound on waiting for a detection result
    #[arg(long, default_value_t = 90)]
    detection_timeout_secs: u64,

    #[arg(long, env = "SUPADATA_BASE_URL")]
    extraction_endpoint: Option<String>,

    #[arg(long, env = "XAI_BASE_URL")]
    inference_endpoint: Option<String>,

    #[arg(long, env = "REALITY_DEFENDER_BASE_URL")]
    detection_endpoint: Option<String>,
}

impl Args {
    fn into_config(self) -> GatewayConfig {
        let mut config = GatewayConfig {
            credentials: Credentials {
                media_detection: self.media_detection_key,
                extraction: self.extraction_key,
                inference: self.inference_key,
            },
            ..GatewayConfig::default()
        };
        config.inference.timeout = Duration::from_secs(self.inference_timeout_secs);
        config.detection.timeout = Duration::from_secs(self.detection_timeout_secs);
        if let Some(endpoint) = self.extraction_endpoint {
            config.extraction.endpoint = endpoint;
        }
        if let Some(endpoint) = self.inference_endpoint {
            config.inference.endpoint = endpoint;
        }
        if let Some(endpoint) = self.detection_endpoint {
            config.detection.endpoint = endpoint;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let bind = args.bind;
    let config = args.into_config();

    info!("Starting verification gateway");
    info!("Credentials: {:?}", config.credentials);
    if config.credentials.require_media_detection().is_err() {
        error!("{} is not set; /api/verify-image will fail", MEDIA_DETECTION_KEY_ENV);
    }
    if config.credentials.require_extraction().is_err() {
        error!("{} is not set; /api/verify-link will fail", EXTRACTION_KEY_ENV);
    }
    if config.credentials.require_inference().is_err() {
        error!("{} is not set; text and link verification will fail", INFERENCE_KEY_ENV);
    }

    let pipeline = Arc::new(VerificationPipeline::from_config(config)?);
    server::serve(bind, pipeline).await?;

    info!("Verification gateway stopped");
    Ok(())
}
