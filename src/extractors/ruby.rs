//! Ruby dependency extraction (Gemfile.lock, Gemfile)
//!
//! Gemfile.lock's DEPENDENCIES section lists the direct dependencies and
//! its specs section pins exact versions. The Gemfile then only overwrites
//! the constraint field of entries already present — group information in
//! lock-based extraction stays as the lock reported it.

use super::{Dependency, DependencyExtractor, DependencyType};
use crate::fs;
use anyhow::Result;
use regex::Regex;
use std::path::Path;

pub struct RubyExtractor;

impl DependencyExtractor for RubyExtractor {
    fn ecosystem(&self) -> &'static str {
        "rubygems"
    }

    fn languages(&self) -> &'static [&'static str] {
        &["ruby"]
    }

    fn extract(&self, root: &Path) -> Result<Vec<Dependency>> {
        let lock_path = root.join("Gemfile.lock");
        let gemfile_path = root.join("Gemfile");

        if fs::file_exists(&lock_path) {
            let mut deps = parse_lockfile(&fs::read_text_file(&lock_path)?);
            if fs::file_exists(&gemfile_path) {
                let manifest = parse_gemfile(&fs::read_text_file(&gemfile_path)?);
                overlay_constraints(&mut deps, &manifest);
            }
            return Ok(deps);
        }

        if fs::file_exists(&gemfile_path) {
            return Ok(parse_gemfile(&fs::read_text_file(&gemfile_path)?));
        }

        Ok(Vec::new())
    }
}

fn overlay_constraints(deps: &mut [Dependency], manifest: &[Dependency]) {
    for dep in deps.iter_mut() {
        if let Some(declared) = manifest.iter().find(|m| m.name == dep.name) {
            if declared.version_constraint.is_some() {
                dep.version_constraint = declared.version_constraint.clone();
            }
        }
    }
}

/// Direct dependencies from the DEPENDENCIES section, exact versions from
/// the specs listing (two-space indented `name (1.2.3)` lines).
fn parse_lockfile(content: &str) -> Vec<Dependency> {
    let spec_re = Regex::new(r"^    ([\w-]+) \(([^)]+)\)$").unwrap();
    let direct_re = Regex::new(r"^  ([\w-]+)(?:\s+\(([^)]+)\))?(!?)$").unwrap();

    let mut versions: Vec<(String, String)> = Vec::new();
    let mut direct: Vec<(String, Option<String>)> = Vec::new();
    let mut section = "";

    for line in content.lines() {
        if !line.starts_with(' ') && !line.is_empty() {
            section = line.trim();
            continue;
        }
        match section {
            "GEM" | "GIT" | "PATH" => {
                if let Some(caps) = spec_re.captures(line) {
                    versions.push((caps[1].to_string(), caps[2].to_string()));
                }
            }
            "DEPENDENCIES" => {
                if let Some(caps) = direct_re.captures(line) {
                    let constraint = caps.get(2).map(|m| m.as_str().to_string());
                    direct.push((caps[1].to_string(), constraint));
                }
            }
            _ => {}
        }
    }

    direct
        .into_iter()
        .map(|(name, constraint)| {
            let mut dep = Dependency::runtime(name.clone());
            dep.version = versions
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone());
            dep.version_constraint = constraint;
            dep
        })
        .collect()
}

/// `gem "name", "~> 1.0"` lines, with `group :development/:test do` blocks
/// mapping to development dependencies.
fn parse_gemfile(content: &str) -> Vec<Dependency> {
    let gem_re =
        Regex::new(r#"^\s*gem\s+["']([\w-]+)["'](?:\s*,\s*["']([^"']+)["'])?"#).unwrap();
    let group_re = Regex::new(r"^\s*group\s+(.+?)\s+do").unwrap();

    let mut deps: Vec<Dependency> = Vec::new();
    let mut group_stack: Vec<String> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(caps) = group_re.captures(trimmed) {
            group_stack.push(caps[1].to_string());
            continue;
        }
        if trimmed == "end" {
            group_stack.pop();
            continue;
        }
        let Some(caps) = gem_re.captures(line) else {
            continue;
        };
        let name = caps[1].to_string();
        if deps.iter().any(|d| d.name == name) {
            continue;
        }

        let in_dev_group = group_stack
            .iter()
            .any(|g| g.contains(":development") || g.contains(":test"));
        let dep_type = if in_dev_group {
            DependencyType::Development
        } else {
            DependencyType::Runtime
        };

        let mut dep = Dependency::new(name, dep_type);
        dep.version_constraint = caps.get(2).map(|m| m.as_str().to_string());
        if !group_stack.is_empty() {
            dep.scope = Some(group_stack.join(","));
        }
        deps.push(dep);
    }
    deps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    const LOCK: &str = "GEM\n  remote: https://rubygems.org/\n  specs:\n    rails (7.0.8)\n      actionpack (= 7.0.8)\n    pg (1.5.4)\n    rspec (3.12.0)\n\nPLATFORMS\n  ruby\n\nDEPENDENCIES\n  pg\n  rails (~> 7.0)\n  rspec\n\nBUNDLED WITH\n   2.4.10\n";

    #[test]
    fn test_lockfile_direct_deps_only() {
        let deps = parse_lockfile(LOCK);

        // actionpack is transitive (deeper indent) and must not appear.
        assert_eq!(deps.len(), 3);
        assert!(!deps.iter().any(|d| d.name == "actionpack"));

        let rails = deps.iter().find(|d| d.name == "rails").unwrap();
        assert_eq!(rails.version.as_deref(), Some("7.0.8"));
        assert_eq!(rails.version_constraint.as_deref(), Some("~> 7.0"));
    }

    #[test]
    fn test_gemfile_groups() {
        let deps = parse_gemfile(
            "source \"https://rubygems.org\"\n\ngem \"rails\", \"~> 7.0\"\n\ngroup :development, :test do\n  gem \"rspec\"\nend\n",
        );

        let rails = deps.iter().find(|d| d.name == "rails").unwrap();
        assert_eq!(rails.dep_type, DependencyType::Runtime);
        assert_eq!(rails.version_constraint.as_deref(), Some("~> 7.0"));

        let rspec = deps.iter().find(|d| d.name == "rspec").unwrap();
        assert_eq!(rspec.dep_type, DependencyType::Development);
        assert!(rspec.scope.is_some());
    }

    #[test]
    fn test_gemfile_constraint_overlays_lock() {
        let dir = TempDir::new().unwrap();
        stdfs::write(dir.path().join("Gemfile.lock"), LOCK).unwrap();
        stdfs::write(
            dir.path().join("Gemfile"),
            "gem \"pg\", \">= 1.5\"\ngroup :test do\n  gem \"rspec\", \"~> 3.12\"\nend\n",
        )
        .unwrap();

        let deps = RubyExtractor.extract(dir.path()).unwrap();

        let pg = deps.iter().find(|d| d.name == "pg").unwrap();
        assert_eq!(pg.version.as_deref(), Some("1.5.4"));
        assert_eq!(pg.version_constraint.as_deref(), Some(">= 1.5"));

        // Only the constraint field is overwritten: the lock-derived entry
        // stays a runtime dependency even though the Gemfile groups it.
        let rspec = deps.iter().find(|d| d.name == "rspec").unwrap();
        assert_eq!(rspec.dep_type, DependencyType::Runtime);
        assert_eq!(rspec.version_constraint.as_deref(), Some("~> 3.12"));
    }

    #[test]
    fn test_no_files_yields_empty() {
        let dir = TempDir::new().unwrap();
        let deps = RubyExtractor.extract(dir.path()).unwrap();
        assert!(deps.is_empty());
    }
}
