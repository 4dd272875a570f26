//! Shared per-language detection engine
//!
//! One orchestration flow serves every language: the three analyzers run
//! scoped to the spec's extensions, config filenames and framework table,
//! the best-matching observation per kind feeds the scoring engine, and the
//! spec's hooks fill in runtime version and framework. Adding a language
//! means adding a `LanguageSpec`, not touching this flow.

use super::analyzers::{config_files, extensions, source_patterns};
use super::scoring::{calculate_confidence_score, primary_framework, primary_runtime_version};
use super::types::{
    DetectionEvidence, DetectionOptions, EvidencePayload, LanguageDetectionResult,
};
use crate::cache::{DetectionCache, DETECTION_TTL};
use crate::languages::LanguageSpec;
use crate::toolchain::{CommandRunner, SystemCommandRunner};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct LanguageDetector {
    spec: Arc<dyn LanguageSpec>,
    runner: Arc<dyn CommandRunner>,
    cache: Option<Arc<DetectionCache>>,
}

impl LanguageDetector {
    pub fn new(spec: Arc<dyn LanguageSpec>) -> Self {
        Self {
            spec,
            runner: Arc::new(SystemCommandRunner::new()),
            cache: None,
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_cache(mut self, cache: Arc<DetectionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn language(&self) -> &'static str {
        self.spec.name()
    }

    pub async fn detect(&self, root: &Path, options: &DetectionOptions) -> LanguageDetectionResult {
        let cache_key = format!(
            "{}:{}:{}",
            self.spec.name(),
            root.display(),
            options.cache_fragment()
        );
        if options.cache_enabled {
            if let Some(cache) = &self.cache {
                if let Some(result) = cache.get::<LanguageDetectionResult>(&cache_key) {
                    debug!(language = self.spec.name(), "Detection served from cache");
                    return result;
                }
            }
        }

        let mut evidence: Vec<DetectionEvidence> = Vec::new();

        let extension_observations = extensions::analyze(root, Some(self.spec.extensions()));
        if let Some(obs) = best_or_first(extension_observations, self.spec.name(), |o| &o.language)
        {
            evidence.push(DetectionEvidence::new(EvidencePayload::FileExtension(obs)));
        }

        let config_observations = config_files::analyze(root, self.spec.config_files());
        let config_obs = best_or_first(config_observations, self.spec.name(), |o| &o.language);
        if let Some(obs) = config_obs.clone() {
            evidence.push(DetectionEvidence::new(EvidencePayload::ConfigFile(obs)));
        }

        let source_observations = source_patterns::analyze(
            root,
            self.spec.extensions(),
            self.spec.framework_patterns(),
            options.max_files_to_analyze,
        );
        let source_obs = best_or_first(source_observations, self.spec.name(), |o| &o.language);
        if let Some(obs) = source_obs.clone() {
            evidence.push(DetectionEvidence::new(EvidencePayload::SourceCode(obs)));
        }

        let mut confidence = calculate_confidence_score(&evidence);

        let mut runtime_version = self
            .spec
            .extract_runtime_version(config_obs.as_ref())
            .or_else(|| primary_runtime_version(&evidence));
        if runtime_version.is_none() {
            runtime_version = self.spec.fallback_runtime_version(root);
        }

        let framework = self
            .spec
            .detect_framework(root, source_obs.as_ref(), config_obs.as_ref())
            .or_else(|| primary_framework(&evidence));

        // Last-resort probe: only meaningful when some static evidence
        // exists but left the verdict under the threshold. A project with
        // zero matching files must stay at confidence 0.
        if !evidence.is_empty() && confidence < options.confidence_threshold {
            if let Some(signal) = self.spec.low_confidence_probe(root, &*self.runner).await {
                debug!(
                    language = self.spec.name(),
                    floor = signal.confidence_floor,
                    "Low-confidence probe fired"
                );
                confidence = confidence.max(signal.confidence_floor);
                if runtime_version.is_none() {
                    runtime_version = signal.version;
                }
            }
        }

        let result = LanguageDetectionResult {
            language: self.spec.name().to_string(),
            runtime_version,
            framework,
            confidence,
        };

        if options.cache_enabled {
            if let Some(cache) = &self.cache {
                cache.set(&cache_key, &result, DETECTION_TTL);
            }
        }

        debug!(
            language = %result.language,
            confidence = result.confidence,
            "Detector finished"
        );
        result
    }
}

/// Keep the observation whose inferred language matches the detector's,
/// falling back to the first element. The fallback is a documented
/// tie-break: it can inject another language's observation into this
/// detector's evidence, and that behavior is pinned by tests rather than
/// corrected here.
fn best_or_first<T, F>(items: Vec<T>, language: &str, language_of: F) -> Option<T>
where
    F: Fn(&T) -> &str,
{
    let position = items.iter().position(|item| language_of(item) == language);
    match position {
        Some(index) => items.into_iter().nth(index),
        None => items.into_iter().next(),
    }
}
