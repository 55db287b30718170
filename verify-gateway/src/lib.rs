pub mod types;
pub mod classifier;
pub mod extractor;
pub mod schema;
pub mod inference;
pub mod validator;
pub mod detection;
pub mod traits;
pub mod providers;
pub mod pipeline;
pub mod server;
pub mod utils;

pub use types::*;
pub use classifier::classify;
pub use extractor::ContentExtractor;
pub use inference::{RawInferenceResponse, VerdictInferenceClient};
pub use validator::validate;
pub use detection::{MediaDetector, UploadArtifact};
pub use traits::{
    DetectionPoll, DetectionProvider, DetectionReport, ExtractionProvider, InferenceRequest, LlmAdapter,
    UploadReceipt,
};
pub use pipeline::{PipelineBuilder, VerificationOutcome, VerificationPipeline};
