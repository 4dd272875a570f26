//! Configuration-file analyzer
//!
//! Probes candidate filenames directly under the project root (no recursive
//! search) and dispatches each present file to a format-specific parser:
//! JSON, TOML, XML, YAML, plain text, or a language-specific script format.
//! A parse failure is logged and the file omitted from results; it never
//! aborts sibling checks.

use crate::detection::types::ConfigFileObservation;
use crate::fs;
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::path::Path;
use tracing::warn;

/// Dependency-name lookups used to attach a framework to a manifest.
const PYTHON_FRAMEWORK_DEPS: &[(&str, &str)] = &[
    ("django", "django"),
    ("flask", "flask"),
    ("fastapi", "fastapi"),
];

const NODE_FRAMEWORK_DEPS: &[(&str, &str)] = &[
    ("next", "nextjs"),
    ("@nestjs/core", "nestjs"),
    ("@angular/core", "angular"),
    ("express", "express"),
    ("fastify", "fastify"),
    ("react", "react"),
];

const JAVA_FRAMEWORK_DEPS: &[(&str, &str)] = &[
    ("spring-boot", "spring-boot"),
    ("quarkus", "quarkus"),
    ("micronaut", "micronaut"),
];

const RUBY_FRAMEWORK_DEPS: &[(&str, &str)] = &[("rails", "rails"), ("sinatra", "sinatra")];

const GO_FRAMEWORK_DEPS: &[(&str, &str)] = &[
    ("github.com/gin-gonic/gin", "gin"),
    ("github.com/labstack/echo", "echo"),
    ("github.com/gofiber/fiber", "fiber"),
];

const RUST_FRAMEWORK_DEPS: &[(&str, &str)] = &[
    ("actix-web", "actix-web"),
    ("axum", "axum"),
    ("rocket", "rocket"),
];

/// Check each candidate filename under `root` and parse the ones present.
pub fn analyze(root: &Path, candidates: &[&str]) -> Vec<ConfigFileObservation> {
    let mut observations = Vec::new();

    for candidate in candidates {
        let path = root.join(candidate);
        if !fs::file_exists(&path) {
            continue;
        }
        match parse_config_file(&path, candidate) {
            Ok(observation) => observations.push(observation),
            Err(err) => {
                warn!(
                    file = %path.display(),
                    error = %err,
                    "Failed to parse config file, skipping"
                );
            }
        }
    }

    observations
}

fn parse_config_file(path: &Path, filename: &str) -> Result<ConfigFileObservation> {
    let content = fs::read_text_file(path)?;
    match filename {
        "package.json" => parse_package_json(path, &content),
        "tsconfig.json" => parse_tsconfig(path, &content),
        "pyproject.toml" => parse_pyproject(path, &content),
        "Pipfile" => parse_pipfile(path, &content),
        "Cargo.toml" => parse_cargo_toml(path, &content),
        "pom.xml" => parse_pom_xml(path, &content),
        "go.mod" => parse_go_mod(path, &content),
        "requirements.txt" => parse_requirements(path, &content),
        "Gemfile" => parse_gemfile(path, &content),
        "build.gradle" | "build.gradle.kts" => parse_gradle(path, &content),
        "setup.py" => parse_setup_py(path, &content),
        ".python-version" => parse_version_pragma(path, &content, "python"),
        ".ruby-version" => parse_version_pragma(path, &content, "ruby"),
        ".go-version" => parse_version_pragma(path, &content, "go"),
        other => Err(anyhow!("no parser registered for {}", other)),
    }
}

/// First dotted-numeric run in a version-bearing string, e.g.
/// `">=3.11,<4"` -> `3.11`.
pub fn extract_version(raw: &str) -> Option<String> {
    let re = Regex::new(r"(\d+(?:\.\d+)*)").ok()?;
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn lookup_framework(dependencies: &[String], table: &[(&str, &str)]) -> Option<String> {
    for (needle, framework) in table {
        // Exact match, or a versioned module path like .../echo/v4.
        if dependencies
            .iter()
            .any(|d| d == needle || d.starts_with(&format!("{}/", needle)))
        {
            return Some((*framework).to_string());
        }
    }
    None
}

fn observation(
    path: &Path,
    language: &str,
    version: Option<String>,
    framework: Option<String>,
    dependencies: Vec<String>,
) -> ConfigFileObservation {
    ConfigFileObservation {
        path: path.to_path_buf(),
        language: language.to_string(),
        version,
        framework,
        dependencies,
    }
}

// --- JSON formats ---

fn parse_package_json(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("invalid package.json")?;

    let mut dependencies = Vec::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(map) = value.get(section).and_then(|v| v.as_object()) {
            dependencies.extend(map.keys().cloned());
        }
    }

    // Declared engine field, e.g. "engines": { "node": ">=18" }.
    let version = value
        .get("engines")
        .and_then(|e| e.get("node"))
        .and_then(|n| n.as_str())
        .and_then(extract_version);

    let framework = lookup_framework(&dependencies, NODE_FRAMEWORK_DEPS);
    Ok(observation(path, "javascript", version, framework, dependencies))
}

fn parse_tsconfig(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let _: serde_json::Value = serde_json::from_str(content).context("invalid tsconfig.json")?;
    Ok(observation(path, "typescript", None, None, Vec::new()))
}

// --- TOML formats ---

fn parse_pyproject(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let value: toml::Value = toml::from_str(content).context("invalid pyproject.toml")?;

    let mut dependencies = Vec::new();
    let mut version = None;

    if let Some(project) = value.get("project") {
        if let Some(requires) = project.get("requires-python").and_then(|v| v.as_str()) {
            version = extract_version(requires);
        }
        if let Some(deps) = project.get("dependencies").and_then(|v| v.as_array()) {
            for dep in deps {
                if let Some(spec) = dep.as_str() {
                    if let Some(name) = requirement_name(spec) {
                        dependencies.push(name);
                    }
                }
            }
        }
    }

    if let Some(poetry) = value.get("tool").and_then(|t| t.get("poetry")) {
        for section in ["dependencies", "dev-dependencies"] {
            if let Some(deps) = poetry.get(section).and_then(|d| d.as_table()) {
                for (name, spec) in deps {
                    if name == "python" {
                        if version.is_none() {
                            version = spec.as_str().and_then(extract_version);
                        }
                        continue;
                    }
                    dependencies.push(name.clone());
                }
            }
        }
    }

    let framework = lookup_framework(&dependencies, PYTHON_FRAMEWORK_DEPS);
    Ok(observation(path, "python", version, framework, dependencies))
}

fn parse_pipfile(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let value: toml::Value = toml::from_str(content).context("invalid Pipfile")?;

    let version = value
        .get("requires")
        .and_then(|r| r.get("python_version"))
        .and_then(|v| v.as_str())
        .and_then(extract_version);

    let mut dependencies = Vec::new();
    for section in ["packages", "dev-packages"] {
        if let Some(deps) = value.get(section).and_then(|d| d.as_table()) {
            dependencies.extend(deps.keys().cloned());
        }
    }

    let framework = lookup_framework(&dependencies, PYTHON_FRAMEWORK_DEPS);
    Ok(observation(path, "python", version, framework, dependencies))
}

fn parse_cargo_toml(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let value: toml::Value = toml::from_str(content).context("invalid Cargo.toml")?;

    let version = value
        .get("package")
        .and_then(|p| p.get("rust-version"))
        .and_then(|v| v.as_str())
        .and_then(extract_version);

    let mut dependencies = Vec::new();
    for section in ["dependencies", "dev-dependencies", "build-dependencies"] {
        if let Some(deps) = value.get(section).and_then(|d| d.as_table()) {
            dependencies.extend(deps.keys().cloned());
        }
    }

    let framework = lookup_framework(&dependencies, RUST_FRAMEWORK_DEPS);
    Ok(observation(path, "rust", version, framework, dependencies))
}

// --- XML formats ---

fn parse_pom_xml(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let doc = roxmltree::Document::parse(content).context("invalid pom.xml")?;

    let mut version = None;
    for node in doc.descendants() {
        match node.tag_name().name() {
            "java.version" | "maven.compiler.source" | "maven.compiler.release" => {
                if version.is_none() {
                    version = node.text().and_then(extract_version);
                }
            }
            _ => {}
        }
    }

    let mut dependencies = Vec::new();
    for node in doc.descendants().filter(|n| n.has_tag_name("dependency")) {
        let group = node
            .children()
            .find(|c| c.has_tag_name("groupId"))
            .and_then(|c| c.text());
        let artifact = node
            .children()
            .find(|c| c.has_tag_name("artifactId"))
            .and_then(|c| c.text());
        if let (Some(group), Some(artifact)) = (group, artifact) {
            dependencies.push(format!("{}:{}", group.trim(), artifact.trim()));
        }
    }

    let framework = dependencies
        .iter()
        .find_map(|d| {
            JAVA_FRAMEWORK_DEPS
                .iter()
                .find(|(needle, _)| d.contains(needle))
                .map(|(_, fw)| (*fw).to_string())
        });

    Ok(observation(path, "java", version, framework, dependencies))
}

// --- plain-text and directive formats ---

fn parse_go_mod(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    // Toolchain directive: `go 1.21`.
    let version_re = Regex::new(r"(?m)^go\s+(\d+(?:\.\d+)*)").unwrap();
    let version = version_re
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let require_re = Regex::new(r"(?m)^\s*(?:require\s+)?([\w./-]+\.[\w./-]+)\s+v[\d.]").unwrap();
    let mut dependencies = Vec::new();
    for caps in require_re.captures_iter(content) {
        let name = caps[1].to_string();
        if !dependencies.contains(&name) {
            dependencies.push(name);
        }
    }

    let framework = lookup_framework(&dependencies, GO_FRAMEWORK_DEPS);
    Ok(observation(path, "go", version, framework, dependencies))
}

fn parse_requirements(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let mut dependencies = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('-') {
            continue;
        }
        if let Some(name) = requirement_name(trimmed) {
            if !dependencies.contains(&name) {
                dependencies.push(name);
            }
        }
    }

    let framework = lookup_framework(&dependencies, PYTHON_FRAMEWORK_DEPS);
    Ok(observation(path, "python", None, framework, dependencies))
}

/// Version-pragma files hold nothing but a version, e.g. `.python-version`.
fn parse_version_pragma(path: &Path, content: &str, language: &str) -> Result<ConfigFileObservation> {
    let first_line = content.lines().next().unwrap_or("").trim();
    let version =
        extract_version(first_line).ok_or_else(|| anyhow!("no version in pragma file"))?;
    Ok(observation(path, language, Some(version), None, Vec::new()))
}

// --- language-specific script formats ---

fn parse_gemfile(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let version_re = Regex::new(r#"(?m)^\s*ruby\s+["']([^"']+)["']"#).unwrap();
    let version = version_re
        .captures(content)
        .and_then(|c| c.get(1))
        .and_then(|m| extract_version(m.as_str()));

    let gem_re = Regex::new(r#"(?m)^\s*gem\s+["']([\w-]+)["']"#).unwrap();
    let mut dependencies = Vec::new();
    for caps in gem_re.captures_iter(content) {
        let name = caps[1].to_string();
        if !dependencies.contains(&name) {
            dependencies.push(name);
        }
    }

    let framework = lookup_framework(&dependencies, RUBY_FRAMEWORK_DEPS);
    Ok(observation(path, "ruby", version, framework, dependencies))
}

fn parse_gradle(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let version_re =
        Regex::new(r#"(?m)(?:sourceCompatibility|targetCompatibility)\s*=?\s*["']?(\d+(?:\.\d+)*)"#)
            .unwrap();
    let version = version_re
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let dep_re = Regex::new(
        r#"(?m)(?:implementation|api|compileOnly|runtimeOnly|testImplementation)\s*\(?\s*["']([^:"']+:[^:"']+)"#,
    )
    .unwrap();
    let mut dependencies = Vec::new();
    for caps in dep_re.captures_iter(content) {
        let name = caps[1].to_string();
        if !dependencies.contains(&name) {
            dependencies.push(name);
        }
    }

    let framework = dependencies.iter().find_map(|d| {
        JAVA_FRAMEWORK_DEPS
            .iter()
            .find(|(needle, _)| d.contains(needle))
            .map(|(_, fw)| (*fw).to_string())
    });

    Ok(observation(path, "java", version, framework, dependencies))
}

fn parse_setup_py(path: &Path, content: &str) -> Result<ConfigFileObservation> {
    let dep_re = Regex::new(r#"["']([A-Za-z0-9][\w.-]*)\s*(?:[=<>!~]|["'])"#).unwrap();
    let mut dependencies = Vec::new();
    if let Some(section_start) = content.find("install_requires") {
        let section = &content[section_start..];
        let section_end = section.find(']').unwrap_or(section.len());
        for caps in dep_re.captures_iter(&section[..section_end]) {
            let name = caps[1].to_string();
            if !dependencies.contains(&name) {
                dependencies.push(name);
            }
        }
    }

    let framework = lookup_framework(&dependencies, PYTHON_FRAMEWORK_DEPS);
    Ok(observation(path, "python", None, framework, dependencies))
}

/// Package name prefix of a PEP 508-style requirement line.
fn requirement_name(spec: &str) -> Option<String> {
    let re = Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)").ok()?;
    re.captures(spec)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        stdfs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_missing_candidates_yield_nothing() {
        let dir = TempDir::new().unwrap();
        let observations = analyze(dir.path(), &["package.json", "pyproject.toml"]);
        assert!(observations.is_empty());
    }

    #[test]
    fn test_package_json() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "package.json",
            r#"{
                "name": "app",
                "engines": { "node": ">=18.2" },
                "dependencies": { "express": "^4.18.0" },
                "devDependencies": { "jest": "^29.0.0" }
            }"#,
        );

        let observations = analyze(dir.path(), &["package.json"]);
        assert_eq!(observations.len(), 1);
        let obs = &observations[0];
        assert_eq!(obs.language, "javascript");
        assert_eq!(obs.version.as_deref(), Some("18.2"));
        assert_eq!(obs.framework.as_deref(), Some("express"));
        assert!(obs.dependencies.contains(&"express".to_string()));
        assert!(obs.dependencies.contains(&"jest".to_string()));
    }

    #[test]
    fn test_malformed_json_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", "not json {{{");

        let observations = analyze(dir.path(), &["package.json"]);
        assert!(observations.is_empty());
    }

    #[test]
    fn test_malformed_file_does_not_abort_siblings() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", "broken {");
        write(&dir, "requirements.txt", "flask==2.3.0\n");

        let observations = analyze(dir.path(), &["package.json", "requirements.txt"]);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].language, "python");
    }

    #[test]
    fn test_pyproject_pep621() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "pyproject.toml",
            r#"
[project]
name = "app"
requires-python = ">=3.11"
dependencies = ["django>=4.2", "requests"]
"#,
        );

        let observations = analyze(dir.path(), &["pyproject.toml"]);
        let obs = &observations[0];
        assert_eq!(obs.language, "python");
        assert_eq!(obs.version.as_deref(), Some("3.11"));
        assert_eq!(obs.framework.as_deref(), Some("django"));
        assert!(obs.dependencies.contains(&"requests".to_string()));
    }

    #[test]
    fn test_pyproject_poetry() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "pyproject.toml",
            r#"
[tool.poetry]
name = "app"

[tool.poetry.dependencies]
python = "^3.10"
flask = "^2.3.0"
"#,
        );

        let observations = analyze(dir.path(), &["pyproject.toml"]);
        let obs = &observations[0];
        assert_eq!(obs.version.as_deref(), Some("3.10"));
        assert_eq!(obs.framework.as_deref(), Some("flask"));
        assert!(!obs.dependencies.contains(&"python".to_string()));
    }

    #[test]
    fn test_cargo_toml() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "Cargo.toml",
            r#"
[package]
name = "svc"
rust-version = "1.70"

[dependencies]
axum = "0.7"
serde = "1.0"
"#,
        );

        let observations = analyze(dir.path(), &["Cargo.toml"]);
        let obs = &observations[0];
        assert_eq!(obs.language, "rust");
        assert_eq!(obs.version.as_deref(), Some("1.70"));
        assert_eq!(obs.framework.as_deref(), Some("axum"));
    }

    #[test]
    fn test_go_mod() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "go.mod",
            "module example.com/app\n\ngo 1.21\n\nrequire (\n\tgithub.com/gin-gonic/gin v1.9.0\n\tgithub.com/lib/pq v1.10.7\n)\n",
        );

        let observations = analyze(dir.path(), &["go.mod"]);
        let obs = &observations[0];
        assert_eq!(obs.language, "go");
        assert_eq!(obs.version.as_deref(), Some("1.21"));
        assert_eq!(obs.framework.as_deref(), Some("gin"));
        assert!(obs
            .dependencies
            .contains(&"github.com/lib/pq".to_string()));
    }

    #[test]
    fn test_pom_xml() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "pom.xml",
            r#"<project>
  <properties><java.version>17</java.version></properties>
  <dependencies>
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter-web</artifactId>
    </dependency>
  </dependencies>
</project>"#,
        );

        let observations = analyze(dir.path(), &["pom.xml"]);
        let obs = &observations[0];
        assert_eq!(obs.language, "java");
        assert_eq!(obs.version.as_deref(), Some("17"));
        assert_eq!(obs.framework.as_deref(), Some("spring-boot"));
    }

    #[test]
    fn test_gemfile() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "Gemfile",
            "source \"https://rubygems.org\"\nruby \"3.2.2\"\n\ngem \"rails\", \"~> 7.0\"\ngem \"pg\"\n",
        );

        let observations = analyze(dir.path(), &["Gemfile"]);
        let obs = &observations[0];
        assert_eq!(obs.language, "ruby");
        assert_eq!(obs.version.as_deref(), Some("3.2.2"));
        assert_eq!(obs.framework.as_deref(), Some("rails"));
        assert!(obs.dependencies.contains(&"pg".to_string()));
    }

    #[test]
    fn test_version_pragma_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".python-version", "3.11.4\n");

        let observations = analyze(dir.path(), &[".python-version"]);
        let obs = &observations[0];
        assert_eq!(obs.language, "python");
        assert_eq!(obs.version.as_deref(), Some("3.11.4"));
    }

    #[test]
    fn test_gradle() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "build.gradle",
            "sourceCompatibility = '17'\ndependencies {\n    implementation 'io.micronaut:micronaut-http:4.0.0'\n    testImplementation 'junit:junit:4.13'\n}\n",
        );

        let observations = analyze(dir.path(), &["build.gradle"]);
        let obs = &observations[0];
        assert_eq!(obs.language, "java");
        assert_eq!(obs.version.as_deref(), Some("17"));
        assert_eq!(obs.framework.as_deref(), Some("micronaut"));
    }

    #[test]
    fn test_requirements_txt_names_only() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "requirements.txt",
            "fastapi==0.100.0\nuvicorn[standard]>=0.23\n# comment\n-r other.txt\n",
        );

        let observations = analyze(dir.path(), &["requirements.txt"]);
        let obs = &observations[0];
        assert_eq!(obs.framework.as_deref(), Some("fastapi"));
        assert_eq!(
            obs.dependencies,
            vec!["fastapi".to_string(), "uvicorn".to_string()]
        );
    }

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version(">=3.11,<4"), Some("3.11".to_string()));
        assert_eq!(extract_version("^1.70.0"), Some("1.70.0".to_string()));
        assert_eq!(extract_version("none"), None);
    }
}
