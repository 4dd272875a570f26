//! Detection orchestrator: runs every language detector and reduces to a
//! single verdict.

use super::detector::LanguageDetector;
use super::types::{DetectionOptions, LanguageDetectionResult};
use crate::cache::DetectionCache;
use crate::languages::LanguageRegistry;
use crate::toolchain::{CommandRunner, SystemCommandRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced at the orchestrator boundary. Everything below it
/// (missing files, parse failures, probe failures) degrades evidence
/// instead of failing the call.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Project path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Project path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

pub struct DetectionOrchestrator {
    registry: LanguageRegistry,
    runner: Arc<dyn CommandRunner>,
    cache: Arc<DetectionCache>,
}

impl DetectionOrchestrator {
    pub fn new(
        registry: LanguageRegistry,
        runner: Arc<dyn CommandRunner>,
        cache: Arc<DetectionCache>,
    ) -> Self {
        Self {
            registry,
            runner,
            cache,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            LanguageRegistry::with_defaults(),
            Arc::new(SystemCommandRunner::new()),
            Arc::new(DetectionCache::new(DetectionCache::default_dir())),
        )
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Run every registered detector and select the single best verdict.
    ///
    /// The per-language cache is disabled for this top-level call; results
    /// with zero confidence are dropped, the rest filtered to valid ones
    /// (confidence > 0.7 outright, else > 0.3), and the best is reduced
    /// with a deterministic tie-break.
    pub async fn detect_language(
        &self,
        root: &Path,
    ) -> Result<LanguageDetectionResult, DetectError> {
        self.validate_path(root)?;

        let options = DetectionOptions {
            cache_enabled: false,
            ..Default::default()
        };

        let mut results = Vec::new();
        for spec in self.registry.iter() {
            let detector =
                LanguageDetector::new(spec.clone()).with_runner(self.runner.clone());
            let result = detector.detect(root, &options).await;
            if result.confidence > 0.0 {
                debug!(
                    language = %result.language,
                    confidence = result.confidence,
                    "Candidate result"
                );
                results.push(result);
            }
        }

        if results.is_empty() {
            info!(root = %root.display(), "No detector produced a result");
            return Ok(LanguageDetectionResult::unknown());
        }

        let valid: Vec<LanguageDetectionResult> = results
            .iter()
            .filter(|r| r.confidence > 0.7 || r.confidence > 0.3)
            .cloned()
            .collect();

        let pool = if valid.is_empty() { results } else { valid };
        let best = pick_best(pool);

        info!(
            root = %root.display(),
            language = %best.language,
            confidence = best.confidence,
            "Language detected"
        );
        Ok(best)
    }

    /// Run one language's detector with caching available, honoring the
    /// caller's options.
    pub async fn detect_single(
        &self,
        language: &str,
        root: &Path,
        options: &DetectionOptions,
    ) -> Result<Option<LanguageDetectionResult>, DetectError> {
        self.validate_path(root)?;

        let Some(spec) = self.registry.get(language) else {
            return Ok(None);
        };
        let detector = LanguageDetector::new(spec)
            .with_runner(self.runner.clone())
            .with_cache(self.cache.clone());
        Ok(Some(detector.detect(root, options).await))
    }

    fn validate_path(&self, root: &Path) -> Result<(), DetectError> {
        if !root.exists() {
            return Err(DetectError::PathNotFound(root.to_path_buf()));
        }
        if !crate::fs::dir_exists(root) {
            return Err(DetectError::NotADirectory(root.to_path_buf()));
        }
        Ok(())
    }
}

/// Strictly highest confidence wins; on a tie, prefer the candidate with a
/// resolved runtime version, then one with a resolved framework, else keep
/// the first.
fn pick_best(results: Vec<LanguageDetectionResult>) -> LanguageDetectionResult {
    results
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.confidence > best.confidence {
                return candidate;
            }
            if candidate.confidence < best.confidence {
                return best;
            }
            if best.runtime_version.is_none() && candidate.runtime_version.is_some() {
                return candidate;
            }
            if best.runtime_version.is_some() != candidate.runtime_version.is_some() {
                return best;
            }
            if best.framework.is_none() && candidate.framework.is_some() {
                return candidate;
            }
            best
        })
        .unwrap_or_else(LanguageDetectionResult::unknown)
}
