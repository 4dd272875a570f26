//! Java dependency extraction (pom.xml, build.gradle)
//!
//! pom.xml takes priority when both build files exist. Maven has no
//! lockfile; declared versions are treated as both version and constraint
//! when exact. Names use `groupId:artifactId` coordinates.

use super::{Dependency, DependencyExtractor, DependencyType};
use crate::fs;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

pub struct JavaExtractor;

impl DependencyExtractor for JavaExtractor {
    fn ecosystem(&self) -> &'static str {
        "maven"
    }

    fn languages(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn extract(&self, root: &Path) -> Result<Vec<Dependency>> {
        let pom_path = root.join("pom.xml");
        if fs::file_exists(&pom_path) {
            return parse_pom(&fs::read_text_file(&pom_path)?);
        }

        for name in ["build.gradle", "build.gradle.kts"] {
            let gradle_path = root.join(name);
            if fs::file_exists(&gradle_path) {
                return Ok(parse_gradle(&fs::read_text_file(&gradle_path)?));
            }
        }

        Ok(Vec::new())
    }
}

fn parse_pom(content: &str) -> Result<Vec<Dependency>> {
    let doc = roxmltree::Document::parse(content).context("invalid pom.xml")?;
    let mut deps = Vec::new();

    for node in doc.descendants().filter(|n| n.has_tag_name("dependency")) {
        let child_text = |tag: &str| {
            node.children()
                .find(|c| c.has_tag_name(tag))
                .and_then(|c| c.text())
                .map(|t| t.trim().to_string())
        };

        let (Some(group), Some(artifact)) = (child_text("groupId"), child_text("artifactId"))
        else {
            continue;
        };

        let scope = child_text("scope");
        let dep_type = match scope.as_deref() {
            Some("test") => DependencyType::Development,
            Some("provided") => DependencyType::Build,
            _ => DependencyType::Runtime,
        };

        let mut dep = Dependency::new(format!("{}:{}", group, artifact), dep_type);
        if let Some(version) = child_text("version") {
            // Property references like ${spring.version} stay constraints.
            if version.starts_with("${") {
                dep.version_constraint = Some(version);
            } else {
                dep.version = Some(version.clone());
                dep.version_constraint = Some(version);
            }
        }
        dep.scope = scope;
        deps.push(dep);
    }
    Ok(deps)
}

fn parse_gradle(content: &str) -> Vec<Dependency> {
    let dep_re = Regex::new(
        r#"(?m)^\s*(implementation|api|compileOnly|runtimeOnly|testImplementation)\s*\(?\s*["']([^:"']+):([^:"']+):([^"')]+)["']"#,
    )
    .unwrap();

    let mut deps: Vec<Dependency> = Vec::new();
    for caps in dep_re.captures_iter(content) {
        let configuration = &caps[1];
        let name = format!("{}:{}", &caps[2], &caps[3]);
        if deps.iter().any(|d| d.name == name) {
            continue;
        }

        let dep_type = match configuration {
            "testImplementation" => DependencyType::Development,
            "compileOnly" => DependencyType::Build,
            _ => DependencyType::Runtime,
        };

        let version = caps[4].to_string();
        let mut dep = Dependency::new(name, dep_type);
        dep.version = Some(version.clone());
        dep.version_constraint = Some(version);
        dep.scope = Some(configuration.to_string());
        deps.push(dep);
    }
    deps
}
