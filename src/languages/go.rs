//! Go language spec (go.mod projects)

use super::{toolchain_probe, LanguageSpec, ProbeSignal};
use crate::detection::analyzers::source_patterns::FrameworkPattern;
use crate::toolchain::CommandRunner;
use async_trait::async_trait;
use std::path::Path;

const FRAMEWORKS: &[FrameworkPattern] = &[
    FrameworkPattern {
        name: "gin",
        patterns: &[r"github\.com/gin-gonic/gin", r"gin\.Default\(\)", r"gin\.New\(\)"],
    },
    FrameworkPattern {
        name: "echo",
        patterns: &[r"github\.com/labstack/echo", r"echo\.New\(\)"],
    },
    FrameworkPattern {
        name: "fiber",
        patterns: &[r"github\.com/gofiber/fiber", r"fiber\.New\("],
    },
];

pub struct GoSpec;

#[async_trait]
impl LanguageSpec for GoSpec {
    fn name(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn config_files(&self) -> &'static [&'static str] {
        &["go.mod", ".go-version"]
    }

    fn framework_patterns(&self) -> &'static [FrameworkPattern] {
        FRAMEWORKS
    }

    async fn low_confidence_probe(
        &self,
        _root: &Path,
        runner: &dyn CommandRunner,
    ) -> Option<ProbeSignal> {
        toolchain_probe(runner, "go", &["version"], 0.4).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::testing::MockCommandRunner;

    #[test]
    fn test_contract() {
        let spec = GoSpec;
        assert_eq!(spec.name(), "go");
        assert_eq!(spec.extensions(), &["go"]);
        assert!(spec.config_files().contains(&"go.mod"));
    }

    #[tokio::test]
    async fn test_probe_floor() {
        let spec = GoSpec;
        let runner = MockCommandRunner::new().respond("go", "go version go1.21.5 linux/amd64");
        let signal = spec
            .low_confidence_probe(Path::new("/tmp"), &runner)
            .await
            .unwrap();
        assert_eq!(signal.version.as_deref(), Some("1.21.5"));
        assert_eq!(signal.confidence_floor, 0.4);
    }
}
