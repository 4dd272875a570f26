//! Rust dependency extraction (Cargo.lock, Cargo.toml)
//!
//! Cargo.lock pins the whole resolution graph, so lock entries are
//! restricted to names the manifest declares; the manifest then only
//! overwrites the constraint field (and declared group) of entries already
//! present. Without a lock the manifest stands alone.

use super::{Dependency, DependencyExtractor, DependencySource, DependencyType};
use crate::fs;
use anyhow::{Context, Result};
use std::path::Path;

pub struct RustExtractor;

const MANIFEST_SECTIONS: &[(&str, DependencyType)] = &[
    ("dependencies", DependencyType::Runtime),
    ("dev-dependencies", DependencyType::Development),
    ("build-dependencies", DependencyType::Build),
];

impl DependencyExtractor for RustExtractor {
    fn ecosystem(&self) -> &'static str {
        "cargo"
    }

    fn languages(&self) -> &'static [&'static str] {
        &["rust"]
    }

    fn extract(&self, root: &Path) -> Result<Vec<Dependency>> {
        let lock_path = root.join("Cargo.lock");
        let manifest_path = root.join("Cargo.toml");

        let manifest = if fs::file_exists(&manifest_path) {
            Some(parse_manifest(&fs::read_text_file(&manifest_path)?)?)
        } else {
            None
        };

        if fs::file_exists(&lock_path) {
            let lock = parse_lockfile(&fs::read_text_file(&lock_path)?)?;
            return Ok(match manifest {
                Some(manifest) => merge(lock, manifest),
                None => lock,
            });
        }

        Ok(manifest.unwrap_or_default())
    }
}

fn parse_manifest(content: &str) -> Result<Vec<Dependency>> {
    let value: toml::Value = toml::from_str(content).context("invalid Cargo.toml")?;
    let mut deps = Vec::new();

    for (section, dep_type) in MANIFEST_SECTIONS {
        let Some(table) = value.get(section).and_then(|s| s.as_table()) else {
            continue;
        };
        for (name, spec) in table {
            let mut dep = Dependency::new(name.clone(), *dep_type);
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
                }
                _ => {}
            }
            deps.push(dep);
        }
    }
    Ok(deps)
}

fn parse_lockfile(content: &str) -> Result<Vec<Dependency>> {
    let value: toml::Value = toml::from_str(content).context("invalid Cargo.lock")?;
    let mut deps = Vec::new();

    let Some(packages) = value.get("package").and_then(|p| p.as_array()) else {
        return Ok(deps);
    };
    for package in packages {
        let Some(name) = package.get("name").and_then(|n| n.as_str()) else {
            continue;
        };
        let mut dep = Dependency::runtime(name);
        dep.version = package
            .get("version")
            .and_then(|v| v.as_str())
            .map(String::from);
        if let Some(source) = package.get("source").and_then(|s| s.as_str()) {
            if let Some(url) = source.strip_prefix("git+") {
                dep.source = Some(DependencySource::Git);
                dep.source_url = Some(url.split('#').next().unwrap_or(url).to_string());
            } else if source.starts_with("registry+") {
                dep.source = Some(DependencySource::Registry);
            }
        }
        deps.push(dep);
    }
    Ok(deps)
}

/// Keep lock entries the manifest declares, with the manifest overwriting
/// only constraint and declared group. Manifest entries missing from the
/// lock (e.g. a lock regenerated since) keep their constraint alone.
fn merge(lock: Vec<Dependency>, manifest: Vec<Dependency>) -> Vec<Dependency> {
    let mut merged = Vec::new();
    for declared in manifest {
        match lock.iter().find(|l| l.name == declared.name) {
            Some(locked) => {
                let mut dep = locked.clone();
                dep.version_constraint = declared.version_constraint;
                dep.dep_type = declared.dep_type;
                merged.push(dep);
            }
            None => merged.push(declared),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_sections_and_sources() {
        let deps = parse_manifest(
            r#"
[dependencies]
serde = "1.0"
mylib = { git = "https://github.com/org/mylib", branch = "main" }
locallib = { path = "../locallib" }

[dev-dependencies]
tempfile = "3.8"

[build-dependencies]
cc = "1.0"
"#,
        )
        .unwrap();

        let serde = deps.iter().find(|d| d.name == "serde").unwrap();
        assert_eq!(serde.dep_type, DependencyType::Runtime);
        assert_eq!(serde.version_constraint.as_deref(), Some("1.0"));

        let mylib = deps.iter().find(|d| d.name == "mylib").unwrap();
        assert_eq!(mylib.source, Some(DependencySource::Git));

        let locallib = deps.iter().find(|d| d.name == "locallib").unwrap();
        assert_eq!(locallib.source, Some(DependencySource::Path));

        let tempfile = deps.iter().find(|d| d.name == "tempfile").unwrap();
        assert_eq!(tempfile.dep_type, DependencyType::Development);

        let cc = deps.iter().find(|d| d.name == "cc").unwrap();
        assert_eq!(cc.dep_type, DependencyType::Build);
    }

    #[test]
    fn test_lock_restricted_to_manifest_names() {
        let dir = TempDir::new().unwrap();
        stdfs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"app\"\n\n[dependencies]\nserde = \"1.0\"\n",
        )
        .unwrap();
        stdfs::write(
            dir.path().join("Cargo.lock"),
            r#"
[[package]]
name = "serde"
version = "1.0.195"
source = "registry+https://github.com/rust-lang/crates.io-index"

[[package]]
name = "serde_derive"
version = "1.0.195"
source = "registry+https://github.com/rust-lang/crates.io-index"
"#,
        )
        .unwrap();

        let deps = RustExtractor.extract(dir.path()).unwrap();
        assert_eq!(deps.len(), 1);

        let serde = &deps[0];
        assert_eq!(serde.name, "serde");
        assert_eq!(serde.version.as_deref(), Some("1.0.195"));
        assert_eq!(serde.version_constraint.as_deref(), Some("1.0"));
        assert_eq!(serde.source, Some(DependencySource::Registry));
    }

    #[test]
    fn test_manifest_entry_missing_from_lock_kept() {
        let merged = merge(
            vec![],
            vec![Dependency::runtime("newdep").with_constraint("0.2")],
        );
        assert_eq!(merged.len(), 1);
        assert!(merged[0].version.is_none());
    }

    #[test]
    fn test_git_lock_source_url_strips_fragment() {
        let deps = parse_lockfile(
            r#"
[[package]]
name = "mylib"
version = "0.1.0"
source = "git+https://github.com/org/mylib?branch=main#abc123"
"#,
        )
        .unwrap();
        assert_eq!(deps[0].source, Some(DependencySource::Git));
        assert_eq!(
            deps[0].source_url.as_deref(),
            Some("https://github.com/org/mylib?branch=main")
        );
    }
}
