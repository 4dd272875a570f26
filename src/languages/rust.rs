//! Rust language spec (Cargo projects)

use super::{toolchain_probe, LanguageSpec, ProbeSignal};
use crate::detection::analyzers::source_patterns::FrameworkPattern;
use crate::toolchain::CommandRunner;
use async_trait::async_trait;
use std::path::Path;

const FRAMEWORKS: &[FrameworkPattern] = &[
    FrameworkPattern {
        name: "actix-web",
        patterns: &[r"actix_web::", r"HttpServer::new"],
    },
    FrameworkPattern {
        name: "axum",
        patterns: &[r"axum::", r"Router::new\(\)"],
    },
    FrameworkPattern {
        name: "rocket",
        patterns: &[r"rocket::", r"#\[launch\]"],
    },
];

pub struct RustSpec;

#[async_trait]
impl LanguageSpec for RustSpec {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn config_files(&self) -> &'static [&'static str] {
        &["Cargo.toml"]
    }

    fn framework_patterns(&self) -> &'static [FrameworkPattern] {
        FRAMEWORKS
    }

    async fn low_confidence_probe(
        &self,
        _root: &Path,
        runner: &dyn CommandRunner,
    ) -> Option<ProbeSignal> {
        toolchain_probe(runner, "rustc", &["--version"], 0.4).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::testing::MockCommandRunner;

    #[test]
    fn test_contract() {
        let spec = RustSpec;
        assert_eq!(spec.name(), "rust");
        assert_eq!(spec.extensions(), &["rs"]);
        assert_eq!(spec.config_files(), &["Cargo.toml"]);
    }

    #[tokio::test]
    async fn test_probe_floor() {
        let spec = RustSpec;
        let runner =
            MockCommandRunner::new().respond("rustc", "rustc 1.75.0 (82e1608df 2023-12-21)");
        let signal = spec
            .low_confidence_probe(Path::new("/tmp"), &runner)
            .await
            .unwrap();
        assert_eq!(signal.version.as_deref(), Some("1.75.0"));
        assert_eq!(signal.confidence_floor, 0.4);
    }
}
