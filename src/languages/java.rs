//! Java language spec (Maven/Gradle projects)

use super::LanguageSpec;
use crate::detection::analyzers::source_patterns::FrameworkPattern;
use crate::detection::types::{ConfigFileObservation, SourceCodeObservation};
use crate::fs;
use async_trait::async_trait;
use std::path::Path;

const FRAMEWORKS: &[FrameworkPattern] = &[
    FrameworkPattern {
        name: "spring-boot",
        patterns: &[r"@SpringBootApplication", r"import\s+org\.springframework"],
    },
    FrameworkPattern {
        name: "quarkus",
        patterns: &[r"import\s+io\.quarkus", r"@QuarkusMain"],
    },
    FrameworkPattern {
        name: "micronaut",
        patterns: &[r"import\s+io\.micronaut", r"Micronaut\.run"],
    },
];

pub struct JavaSpec;

#[async_trait]
impl LanguageSpec for JavaSpec {
    fn name(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn config_files(&self) -> &'static [&'static str] {
        &["pom.xml", "build.gradle", "build.gradle.kts"]
    }

    fn framework_patterns(&self) -> &'static [FrameworkPattern] {
        FRAMEWORKS
    }

    /// Source and config evidence first; when neither fired, fall back to
    /// well-known resource-file markers.
    fn detect_framework(
        &self,
        root: &Path,
        source: Option<&SourceCodeObservation>,
        config: Option<&ConfigFileObservation>,
    ) -> Option<String> {
        source
            .and_then(|s| s.framework.clone())
            .or_else(|| config.and_then(|c| c.framework.clone()))
            .or_else(|| resource_marker_framework(root))
    }
}

/// Application configuration files and deployment descriptors that identify
/// a framework even when no dependency or source pattern matched.
fn resource_marker_framework(root: &Path) -> Option<String> {
    if fs::file_exists(&root.join("src/main/resources/application.properties")) {
        return Some("spring-boot".to_string());
    }

    for name in ["application.yml", "application.yaml"] {
        let path = root.join("src/main/resources").join(name);
        let Ok(content) = fs::read_text_file(&path) else {
            continue;
        };
        if serde_yaml::from_str::<serde_yaml::Value>(&content).is_ok() {
            return Some("spring-boot".to_string());
        }
    }

    if fs::file_exists(&root.join("src/main/webapp/WEB-INF/web.xml")) {
        return Some("servlet".to_string());
    }

    None
}
