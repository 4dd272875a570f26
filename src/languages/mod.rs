//! Language specifications and registry for the detection engine
//!
//! A `LanguageSpec` is the single add-a-language extension point: it names
//! the canonical language, scopes the three analyzers (extensions, config
//! filenames, framework-pattern table), and supplies the language-specific
//! version/framework extraction hooks. One shared `LanguageDetector`
//! orchestrates the flow for every spec.

mod go;
mod java;
mod javascript;
mod python;
mod registry;
mod ruby;
mod rust;
mod typescript;

pub use go::GoSpec;
pub use java::JavaSpec;
pub use javascript::JavaScriptSpec;
pub use python::PythonSpec;
pub use registry::LanguageRegistry;
pub use ruby::RubySpec;
pub use rust::RustSpec;
pub use typescript::TypeScriptSpec;

use crate::detection::analyzers::source_patterns::FrameworkPattern;
use crate::detection::types::{ConfigFileObservation, SourceCodeObservation};
use crate::toolchain::{parse_probe_version, CommandRunner, DEFAULT_PROBE_TIMEOUT};
use async_trait::async_trait;
use std::path::Path;

/// Outcome of a last-resort probe: an optional version plus the confidence
/// floor the detector should apply on success.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSignal {
    pub version: Option<String>,
    pub confidence_floor: f64,
}

/// Per-language detection contract.
#[async_trait]
pub trait LanguageSpec: Send + Sync {
    /// Canonical lowercase identifier, e.g. "python".
    fn name(&self) -> &'static str;

    /// File extensions the extension and source analyzers are scoped to.
    fn extensions(&self) -> &'static [&'static str];

    /// Config filenames probed under the project root.
    fn config_files(&self) -> &'static [&'static str];

    /// Framework name -> ordered detection regexes for source scanning.
    fn framework_patterns(&self) -> &'static [FrameworkPattern];

    /// Project-relative marker files consulted as a framework fallback.
    fn entry_point_markers(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Runtime version from config evidence.
    fn extract_runtime_version(&self, config: Option<&ConfigFileObservation>) -> Option<String> {
        config.and_then(|c| c.version.clone())
    }

    /// Fill a still-missing version from the project tree (no confidence
    /// effect). Runs unconditionally after config extraction.
    fn fallback_runtime_version(&self, _root: &Path) -> Option<String> {
        None
    }

    /// Framework from source evidence first, then config evidence, then
    /// entry-point marker files.
    fn detect_framework(
        &self,
        root: &Path,
        source: Option<&SourceCodeObservation>,
        config: Option<&ConfigFileObservation>,
    ) -> Option<String> {
        source
            .and_then(|s| s.framework.clone())
            .or_else(|| config.and_then(|c| c.framework.clone()))
            .or_else(|| {
                self.entry_point_markers()
                    .iter()
                    .find(|(marker, _)| root.join(marker).is_file())
                    .map(|(_, framework)| (*framework).to_string())
            })
    }

    /// Last-resort signal when static evidence left confidence below the
    /// threshold. Failures yield `None`, never an error.
    async fn low_confidence_probe(
        &self,
        _root: &Path,
        _runner: &dyn CommandRunner,
    ) -> Option<ProbeSignal> {
        None
    }
}

/// Shared toolchain probe: run the language's own version command and parse
/// a version out of its output.
pub(crate) async fn toolchain_probe(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    confidence_floor: f64,
) -> Option<ProbeSignal> {
    let output = runner.run(program, args, DEFAULT_PROBE_TIMEOUT).await?;
    Some(ProbeSignal {
        version: parse_probe_version(&output),
        confidence_floor,
    })
}
