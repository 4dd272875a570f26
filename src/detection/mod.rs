//! Evidence-based language detection
//!
//! Three independent analyzers produce weighted, language-tagged
//! observations; the scoring engine combines them into a confidence-scored
//! verdict; per-language detectors orchestrate the analyzers through one
//! shared flow; the orchestrator reduces all detectors to a single result.

pub mod analyzers;
pub mod detector;
pub mod orchestrator;
pub mod scoring;
pub mod types;

pub use detector::LanguageDetector;
pub use orchestrator::{DetectError, DetectionOrchestrator};
pub use types::{
    ConfigFileObservation, DetectionEvidence, DetectionOptions, EvidenceKind, EvidencePayload,
    FileExtensionObservation, LanguageDetectionResult, SourceCodeObservation, UNKNOWN_LANGUAGE,
};
