//! Node dependency extraction (package-lock.json, package.json)
//!
//! The lockfile wins on exact versions; manifest constraints are merged
//! onto lock-derived entries by name. Peer and optional dependencies from
//! the manifest are merged unconditionally — npm lockfiles routinely omit
//! them, so the manifest is authoritative for those two groups.

use super::{Dependency, DependencyExtractor, DependencyType};
use crate::fs;
use anyhow::{Context, Result};
use std::path::Path;

pub struct NodeExtractor;

const MANIFEST_SECTIONS: &[(&str, DependencyType)] = &[
    ("dependencies", DependencyType::Runtime),
    ("devDependencies", DependencyType::Development),
    ("peerDependencies", DependencyType::Peer),
    ("optionalDependencies", DependencyType::Optional),
];

impl DependencyExtractor for NodeExtractor {
    fn ecosystem(&self) -> &'static str {
        "npm"
    }

    fn languages(&self) -> &'static [&'static str] {
        &["javascript", "typescript"]
    }

    fn extract(&self, root: &Path) -> Result<Vec<Dependency>> {
        let lock_path = root.join("package-lock.json");
        let manifest_path = root.join("package.json");

        let manifest = if fs::file_exists(&manifest_path) {
            Some(parse_manifest(&fs::read_text_file(&manifest_path)?)?)
        } else {
            None
        };

        if fs::file_exists(&lock_path) {
            let mut deps = parse_lockfile(&fs::read_text_file(&lock_path)?)?;
            if let Some(manifest) = manifest {
                merge_manifest(&mut deps, manifest);
            }
            return Ok(deps);
        }

        Ok(manifest.unwrap_or_default())
    }
}

fn parse_manifest(content: &str) -> Result<Vec<Dependency>> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("invalid package.json")?;
    let mut deps = Vec::new();

    for (section, dep_type) in MANIFEST_SECTIONS {
        let Some(map) = value.get(section).and_then(|s| s.as_object()) else {
            continue;
        };
        for (name, constraint) in map {
            let mut dep = Dependency::new(name.clone(), *dep_type);
            dep.version_constraint = constraint.as_str().map(String::from);
            deps.push(dep);
        }
    }
    Ok(deps)
}

fn parse_lockfile(content: &str) -> Result<Vec<Dependency>> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("invalid package-lock.json")?;
    let mut deps = Vec::new();

    // Lockfile v2/v3: a flat "packages" map keyed by install path.
    if let Some(packages) = value.get("packages").and_then(|p| p.as_object()) {
        for (path, entry) in packages {
            // The "" key is the root project itself; nested installs keep
            // only the segment after the last node_modules/.
            if path.is_empty() {
                continue;
            }
            let name = path.rsplit("node_modules/").next().unwrap_or("");
            if name.is_empty() {
                continue;
            }
            deps.push(lock_entry(name, entry));
        }
        return Ok(deps);
    }

    // Lockfile v1: a nested "dependencies" map.
    if let Some(dependencies) = value.get("dependencies").and_then(|d| d.as_object()) {
        for (name, entry) in dependencies {
            deps.push(lock_entry(name, entry));
        }
    }
    Ok(deps)
}

fn lock_entry(name: &str, entry: &serde_json::Value) -> Dependency {
    let dep_type = if entry.get("dev").and_then(|d| d.as_bool()).unwrap_or(false) {
        DependencyType::Development
    } else if entry
        .get("optional")
        .and_then(|o| o.as_bool())
        .unwrap_or(false)
    {
        DependencyType::Optional
    } else if entry.get("peer").and_then(|p| p.as_bool()).unwrap_or(false) {
        DependencyType::Peer
    } else {
        DependencyType::Runtime
    };

    let mut dep = Dependency::new(name, dep_type);
    dep.version = entry
        .get("version")
        .and_then(|v| v.as_str())
        .map(String::from);
    dep
}

/// Merge manifest facts into lock-derived entries: constraints (and the
/// declared group) overwrite by name, and peer/optional manifest entries
/// missing from the lock are added as-is.
fn merge_manifest(deps: &mut Vec<Dependency>, manifest: Vec<Dependency>) {
    for declared in manifest {
        if let Some(existing) = deps.iter_mut().find(|d| d.name == declared.name) {
            existing.version_constraint = declared.version_constraint;
            existing.dep_type = declared.dep_type;
        } else if matches!(
            declared.dep_type,
            DependencyType::Peer | DependencyType::Optional
        ) {
            deps.push(declared);
        }
    }
}
