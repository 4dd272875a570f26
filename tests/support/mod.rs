//! Shared fixtures for integration tests

use async_trait::async_trait;
use repoprobe::cache::DetectionCache;
use repoprobe::detection::DetectionOrchestrator;
use repoprobe::languages::LanguageRegistry;
use repoprobe::toolchain::CommandRunner;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Runner that never produces a signal, keeping tests hermetic with
/// respect to toolchains installed on the host.
pub struct NullRunner;

#[async_trait]
impl CommandRunner for NullRunner {
    async fn run(&self, _program: &str, _args: &[&str], _timeout: Duration) -> Option<String> {
        None
    }
}

pub fn orchestrator(cache_root: &Path) -> DetectionOrchestrator {
    DetectionOrchestrator::new(
        LanguageRegistry::with_defaults(),
        Arc::new(NullRunner),
        Arc::new(DetectionCache::new(cache_root.join("cache"))),
    )
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
