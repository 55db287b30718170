pub mod defs;

pub use defs::{
    ClassifiedUrl, Decision, DetectionResult, ExtractedContent, ModelResult, SourceKind,
    VerificationInput, Verdict,
};
