//! repoprobe - evidence-based project inspection
//!
//! This library inspects a project directory and infers its primary
//! programming language, runtime version, and framework, and extracts its
//! declared dependencies across ecosystems - all without executing any of
//! the project's code.
//!
//! # Core Concepts
//!
//! - **Evidence**: one weighted observation (extension histogram entry,
//!   config-file fact, or source pattern) feeding the confidence score
//! - **Detector**: the per-language unit combining the three analyzers and
//!   the scoring engine through one shared flow
//! - **Orchestrator**: runs every detector and reduces to a single
//!   confidence-scored verdict with deterministic tie-breaking
//! - **Extractor**: a per-ecosystem manifest/lockfile parser producing a
//!   flat dependency list
//!
//! # Example Usage
//!
//! ```ignore
//! use repoprobe::detection::DetectionOrchestrator;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = DetectionOrchestrator::with_defaults();
//! let result = orchestrator.detect_language(Path::new("/path/to/repo")).await?;
//!
//! println!("Language: {}", result.language);
//! println!("Confidence: {:.1}%", result.confidence * 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`detection`]: analyzers, scoring engine, detectors, orchestrator
//! - [`languages`]: per-language specs and registry
//! - [`extractors`]: per-ecosystem dependency extraction
//! - [`cache`]: filesystem-backed TTL cache for detection results
//! - [`toolchain`]: command-runner port for toolchain version probes

// Public modules
pub mod cache;
pub mod cli;
pub mod config;
pub mod detection;
pub mod extractors;
pub mod fs;
pub mod languages;
pub mod toolchain;
pub mod util;

// Re-export key types for convenient access
pub use cache::DetectionCache;
pub use config::{ConfigError, ProbeConfig};
pub use detection::{
    DetectError, DetectionOptions, DetectionOrchestrator, LanguageDetectionResult,
    LanguageDetector,
};
pub use extractors::{
    Dependency, DependencyExtractionResult, DependencyService, DependencyType, ExtractorRegistry,
};
pub use languages::{LanguageRegistry, LanguageSpec};
pub use toolchain::{CommandRunner, SystemCommandRunner};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
