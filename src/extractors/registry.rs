//! Extractor registry and the dependency-extraction service
//!
//! The service consumes the orchestrator's language verdict to select an
//! extractor; when that path fails or comes back empty, every extractor
//! runs and the one yielding the most entries wins.

use super::{
    normalize_dependencies, Dependency, DependencyExtractionResult, DependencyExtractor,
    GoExtractor, JavaExtractor, NodeExtractor, PythonExtractor, RubyExtractor, RustExtractor,
};
use crate::detection::{DetectError, DetectionOrchestrator};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn DependencyExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PythonExtractor));
        registry.register(Box::new(NodeExtractor));
        registry.register(Box::new(JavaExtractor));
        registry.register(Box::new(RubyExtractor));
        registry.register(Box::new(GoExtractor));
        registry.register(Box::new(RustExtractor));
        registry
    }

    pub fn register(&mut self, extractor: Box<dyn DependencyExtractor>) {
        self.extractors.push(extractor);
    }

    pub fn for_language(&self, language: &str) -> Option<&dyn DependencyExtractor> {
        self.extractors
            .iter()
            .find(|e| {
                e.languages()
                    .iter()
                    .any(|l| l.eq_ignore_ascii_case(language))
            })
            .map(|e| e.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DependencyExtractor> {
        self.extractors.iter().map(|e| e.as_ref())
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

pub struct DependencyService {
    orchestrator: DetectionOrchestrator,
    registry: ExtractorRegistry,
}

impl DependencyService {
    pub fn new(orchestrator: DetectionOrchestrator, registry: ExtractorRegistry) -> Self {
        Self {
            orchestrator,
            registry,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            DetectionOrchestrator::with_defaults(),
            ExtractorRegistry::with_defaults(),
        )
    }

    /// Detect the project language and extract its declared dependencies.
    pub async fn extract_dependencies(
        &self,
        root: &Path,
    ) -> Result<DependencyExtractionResult, DetectError> {
        let verdict = self.orchestrator.detect_language(root).await?;

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut ecosystem = None;

        let mut dependencies = match self.registry.for_language(&verdict.language) {
            Some(extractor) => {
                ecosystem = Some(extractor.ecosystem().to_string());
                match extractor.extract(root) {
                    Ok(deps) if !deps.is_empty() => deps,
                    Ok(_) => {
                        warnings.push(format!(
                            "{} extractor found no dependencies, trying all ecosystems",
                            extractor.ecosystem()
                        ));
                        Vec::new()
                    }
                    Err(err) => {
                        errors.push(format!("{}: {}", extractor.ecosystem(), err));
                        Vec::new()
                    }
                }
            }
            None => {
                warnings.push(format!(
                    "no extractor registered for language '{}'",
                    verdict.language
                ));
                Vec::new()
            }
        };

        if dependencies.is_empty() {
            if let Some((name, deps)) = self.best_effort_extract(root, &mut warnings) {
                ecosystem = Some(name.to_string());
                dependencies = deps;
            }
        }

        normalize_dependencies(&mut dependencies);

        info!(
            root = %root.display(),
            language = %verdict.language,
            count = dependencies.len(),
            "Dependency extraction completed"
        );

        Ok(DependencyExtractionResult {
            language: verdict.language,
            ecosystem,
            dependencies,
            errors,
            warnings,
        })
    }

    /// Fallback: run every extractor and keep the largest yield.
    fn best_effort_extract(
        &self,
        root: &Path,
        warnings: &mut Vec<String>,
    ) -> Option<(&'static str, Vec<Dependency>)> {
        let mut best: Option<(&'static str, Vec<Dependency>)> = None;
        for extractor in self.registry.iter() {
            match extractor.extract(root) {
                Ok(deps) => {
                    debug!(
                        ecosystem = extractor.ecosystem(),
                        count = deps.len(),
                        "Fallback extraction"
                    );
                    if !deps.is_empty()
                        && best.as_ref().map_or(true, |(_, b)| deps.len() > b.len())
                    {
                        best = Some((extractor.ecosystem(), deps));
                    }
                }
                Err(err) => {
                    warn!(ecosystem = extractor.ecosystem(), error = %err, "Fallback extractor failed");
                    warnings.push(format!("{}: {}", extractor.ecosystem(), err));
                }
            }
        }
        best
    }
}
