//! Python dependency extraction (poetry.lock, pyproject.toml,
//! requirements.txt)
//!
//! File priority: poetry.lock before pyproject.toml before
//! requirements.txt. Lock entries carry exact versions; pyproject
//! constraints are overlaid onto them by name.

use super::{Dependency, DependencyExtractor, DependencySource, DependencyType};
use crate::fs;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

pub struct PythonExtractor;

impl DependencyExtractor for PythonExtractor {
    fn ecosystem(&self) -> &'static str {
        "pypi"
    }

    fn languages(&self) -> &'static [&'static str] {
        &["python"]
    }

    fn extract(&self, root: &Path) -> Result<Vec<Dependency>> {
        let lock_path = root.join("poetry.lock");
        let pyproject_path = root.join("pyproject.toml");
        let requirements_path = root.join("requirements.txt");

        if fs::file_exists(&lock_path) {
            let mut deps = parse_poetry_lock(&fs::read_text_file(&lock_path)?)?;
            if fs::file_exists(&pyproject_path) {
                let manifest = parse_pyproject(&fs::read_text_file(&pyproject_path)?)?;
                overlay_constraints(&mut deps, &manifest);
            }
            return Ok(deps);
        }

        if fs::file_exists(&requirements_path) {
            return parse_requirements(&fs::read_text_file(&requirements_path)?);
        }

        if fs::file_exists(&pyproject_path) {
            return parse_pyproject(&fs::read_text_file(&pyproject_path)?);
        }

        Ok(Vec::new())
    }
}

/// Overlay manifest constraints onto lock-derived exact versions by name.
fn overlay_constraints(deps: &mut [Dependency], manifest: &[Dependency]) {
    for dep in deps.iter_mut() {
        if let Some(declared) = manifest
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(&dep.name))
        {
            dep.version_constraint = declared.version_constraint.clone();
        }
    }
}

fn parse_poetry_lock(content: &str) -> Result<Vec<Dependency>> {
    let value: toml::Value = toml::from_str(content).context("invalid poetry.lock")?;
    let mut deps = Vec::new();

    let Some(packages) = value.get("package").and_then(|p| p.as_array()) else {
        return Ok(deps);
    };
    for package in packages {
        let Some(name) = package.get("name").and_then(|n| n.as_str()) else {
            continue;
        };
        let dep_type = match package.get("category").and_then(|c| c.as_str()) {
            Some("dev") => DependencyType::Development,
            _ => DependencyType::Runtime,
        };
        let mut dep = Dependency::new(name, dep_type);
        dep.version = package
            .get("version")
            .and_then(|v| v.as_str())
            .map(String::from);
        if let Some(source) = package.get("source") {
            if source.get("type").and_then(|t| t.as_str()) == Some("git") {
                dep.source = Some(DependencySource::Git);
                dep.source_url = source
                    .get("url")
                    .and_then(|u| u.as_str())
                    .map(String::from);
            }
        }
        deps.push(dep);
    }
    Ok(deps)
}

fn parse_pyproject(content: &str) -> Result<Vec<Dependency>> {
    let value: toml::Value = toml::from_str(content).context("invalid pyproject.toml")?;
    let mut deps = Vec::new();

    if let Some(project) = value.get("project") {
        if let Some(list) = project.get("dependencies").and_then(|d| d.as_array()) {
            for spec in list.iter().filter_map(|s| s.as_str()) {
                if let Some(dep) = parse_requirement_line(spec, DependencyType::Runtime) {
                    deps.push(dep);
                }
            }
        }
        if let Some(groups) = project
            .get("optional-dependencies")
            .and_then(|d| d.as_table())
        {
            for (group, list) in groups {
                let Some(list) = list.as_array() else { continue };
                for spec in list.iter().filter_map(|s| s.as_str()) {
                    if let Some(mut dep) = parse_requirement_line(spec, DependencyType::Optional) {
                        dep.scope = Some(group.clone());
                        deps.push(dep);
                    }
                }
            }
        }
    }

    if let Some(poetry) = value.get("tool").and_then(|t| t.get("poetry")) {
        if let Some(table) = poetry.get("dependencies").and_then(|d| d.as_table()) {
            collect_poetry_deps(table, DependencyType::Runtime, None, &mut deps);
        }
        if let Some(table) = poetry.get("dev-dependencies").and_then(|d| d.as_table()) {
            collect_poetry_deps(table, DependencyType::Development, None, &mut deps);
        }
        if let Some(groups) = poetry.get("group").and_then(|g| g.as_table()) {
            for (group, section) in groups {
                if let Some(table) = section.get("dependencies").and_then(|d| d.as_table()) {
                    collect_poetry_deps(
                        table,
                        DependencyType::Development,
                        Some(group.as_str()),
                        &mut deps,
                    );
                }
            }
        }
    }

    Ok(deps)
}

fn collect_poetry_deps(
    table: &toml::value::Table,
    dep_type: DependencyType,
    scope: Option<&str>,
    deps: &mut Vec<Dependency>,
) {
    for (name, spec) in table {
        if name == "python" {
            continue;
        }
        let mut dep = Dependency::new(name.clone(), dep_type);
        dep.scope = scope.map(String::from);
        match spec {
            toml::Value::String(constraint) => {
                dep.version_constraint = Some(constraint.clone());
            }
            toml::Value::Table(detail) => {
                dep.version_constraint = detail
                    .get("version")
                    .and_then(|v| v.as_str())
                    .map(String::from);
                if let Some(url) = detail.get("git").and_then(|g| g.as_str()) {
                    dep.source = Some(DependencySource::Git);
                    dep.source_url = Some(url.to_string());
                } else if detail.get("path").is_some() {
                    dep.source = Some(DependencySource::Path);
                }
                if let Some(extras) = detail.get("extras").and_then(|e| e.as_array()) {
                    let extras: Vec<String> = extras
                        .iter()
                        .filter_map(|e| e.as_str().map(String::from))
                        .collect();
                    if !extras.is_empty() {
                        dep.extras = Some(extras);
                    }
                }
            }
            _ => {}
        }
        deps.push(dep);
    }
}

fn parse_requirements(content: &str) -> Result<Vec<Dependency>> {
    let mut deps = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('-') {
            continue;
        }
        if let Some(dep) = parse_requirement_line(trimmed, DependencyType::Runtime) {
            if !deps.iter().any(|d: &Dependency| d.name == dep.name) {
                deps.push(dep);
            }
        }
    }
    Ok(deps)
}

/// One PEP 508-style requirement: name, optional extras, optional
/// constraint. Inline comments and environment markers are stripped; an
/// `==`-pinned constraint also yields the exact version.
fn parse_requirement_line(line: &str, dep_type: DependencyType) -> Option<Dependency> {
    let without_comment = line.split('#').next().unwrap_or("");
    let without_marker = without_comment.split(';').next().unwrap_or("").trim();
    if without_marker.is_empty() {
        return None;
    }

    let re =
        Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)(?:\[([^\]]+)\])?\s*((?:==|>=|<=|~=|!=|>|<).*)?$")
            .ok()?;
    let caps = re.captures(without_marker)?;

    let mut dep = Dependency::new(caps.get(1)?.as_str(), dep_type);

    if let Some(extras) = caps.get(2) {
        dep.extras = Some(
            extras
                .as_str()
                .split(',')
                .map(|e| e.trim().to_string())
                .collect(),
        );
    }

    if let Some(constraint) = caps.get(3) {
        let constraint = constraint.as_str().trim().to_string();
        if let Some(pinned) = constraint.strip_prefix("==") {
            if !pinned.contains(',') {
                dep.version = Some(pinned.trim().to_string());
            }
        }
        dep.version_constraint = Some(constraint);
    }

    Some(dep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    #[test]
    fn test_pinned_requirement_with_comment() {
        let dep = parse_requirement_line("requests==2.31.0  # pinned", DependencyType::Runtime)
            .unwrap();
        assert_eq!(dep.name, "requests");
        assert_eq!(dep.version.as_deref(), Some("2.31.0"));
        assert_eq!(dep.version_constraint.as_deref(), Some("==2.31.0"));
        assert_eq!(dep.dep_type, DependencyType::Runtime);
    }

    #[test]
    fn test_requirement_extras_and_range() {
        let dep =
            parse_requirement_line("uvicorn[standard]>=0.23,<1.0", DependencyType::Runtime)
                .unwrap();
        assert_eq!(dep.name, "uvicorn");
        assert_eq!(dep.extras, Some(vec!["standard".to_string()]));
        assert_eq!(dep.version_constraint.as_deref(), Some(">=0.23,<1.0"));
        assert!(dep.version.is_none());
    }

    #[test]
    fn test_requirement_environment_marker_stripped() {
        let dep = parse_requirement_line(
            "tomli>=1.1.0; python_version < \"3.11\"",
            DependencyType::Runtime,
        )
        .unwrap();
        assert_eq!(dep.name, "tomli");
        assert_eq!(dep.version_constraint.as_deref(), Some(">=1.1.0"));
    }

    #[test]
    fn test_bare_requirement() {
        let dep = parse_requirement_line("pytest", DependencyType::Runtime).unwrap();
        assert_eq!(dep.name, "pytest");
        assert!(dep.version.is_none());
        assert!(dep.version_constraint.is_none());
    }

    #[test]
    fn test_requirements_file_skips_directives() {
        let deps = parse_requirements("flask==2.3.0\n-r base.txt\n-e .\n# note\n\n").unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "flask");
    }

    #[test]
    fn test_poetry_lock_with_manifest_overlay() {
        let dir = TempDir::new().unwrap();
        stdfs::write(
            dir.path().join("poetry.lock"),
            r#"
[[package]]
name = "flask"
version = "2.3.3"

[[package]]
name = "pytest"
version = "7.4.2"
category = "dev"
"#,
        )
        .unwrap();
        stdfs::write(
            dir.path().join("pyproject.toml"),
            r#"
[tool.poetry.dependencies]
python = "^3.11"
flask = "^2.3.0"
"#,
        )
        .unwrap();

        let deps = PythonExtractor.extract(dir.path()).unwrap();
        let flask = deps.iter().find(|d| d.name == "flask").unwrap();
        assert_eq!(flask.version.as_deref(), Some("2.3.3"));
        assert_eq!(flask.version_constraint.as_deref(), Some("^2.3.0"));

        let pytest = deps.iter().find(|d| d.name == "pytest").unwrap();
        assert_eq!(pytest.dep_type, DependencyType::Development);
        assert!(pytest.version_constraint.is_none());
    }

    #[test]
    fn test_pyproject_poetry_git_source() {
        let deps = parse_pyproject(
            r#"
[tool.poetry.dependencies]
python = "^3.11"
mylib = { git = "https://github.com/org/mylib.git" }
locallib = { path = "../locallib" }
"#,
        )
        .unwrap();

        let mylib = deps.iter().find(|d| d.name == "mylib").unwrap();
        assert_eq!(mylib.source, Some(DependencySource::Git));
        assert_eq!(
            mylib.source_url.as_deref(),
            Some("https://github.com/org/mylib.git")
        );

        let locallib = deps.iter().find(|d| d.name == "locallib").unwrap();
        assert_eq!(locallib.source, Some(DependencySource::Path));
    }

    #[test]
    fn test_pyproject_optional_groups() {
        let deps = parse_pyproject(
            r#"
[project]
name = "app"
dependencies = ["fastapi>=0.100"]

[project.optional-dependencies]
test = ["pytest==7.4.0"]
"#,
        )
        .unwrap();

        let pytest = deps.iter().find(|d| d.name == "pytest").unwrap();
        assert_eq!(pytest.dep_type, DependencyType::Optional);
        assert_eq!(pytest.scope.as_deref(), Some("test"));
        assert_eq!(pytest.version.as_deref(), Some("7.4.0"));
    }

    #[test]
    fn test_no_files_yields_empty() {
        let dir = TempDir::new().unwrap();
        let deps = PythonExtractor.extract(dir.path()).unwrap();
        assert!(deps.is_empty());
    }
}
