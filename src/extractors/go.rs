//! Go dependency extraction (go.mod)
//!
//! go.mod is both manifest and resolution record for direct requirements;
//! no separate lockfile is consulted (go.sum holds checksums, not a
//! dependency list). The `+incompatible` suffix is stripped from the
//! resolved version but preserved in the raw constraint.

use super::{Dependency, DependencyExtractor};
use crate::fs;
use anyhow::Result;
use regex::Regex;
use std::path::Path;

pub struct GoExtractor;

impl DependencyExtractor for GoExtractor {
    fn ecosystem(&self) -> &'static str {
        "gomod"
    }

    fn languages(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn extract(&self, root: &Path) -> Result<Vec<Dependency>> {
        let path = root.join("go.mod");
        if !fs::file_exists(&path) {
            return Ok(Vec::new());
        }
        Ok(parse_go_mod(&fs::read_text_file(&path)?))
    }
}

fn parse_go_mod(content: &str) -> Vec<Dependency> {
    let require_re =
        Regex::new(r"^([\w./-]+)\s+(v\S+)(\s*//\s*indirect)?").unwrap();

    let mut deps: Vec<Dependency> = Vec::new();
    let mut in_require_block = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("require (") {
            in_require_block = true;
            continue;
        }
        if in_require_block && trimmed == ")" {
            in_require_block = false;
            continue;
        }

        let candidate = if in_require_block {
            trimmed
        } else if let Some(rest) = trimmed.strip_prefix("require ") {
            rest.trim()
        } else {
            continue;
        };

        let Some(caps) = require_re.captures(candidate) else {
            continue;
        };
        let name = caps[1].to_string();
        if deps.iter().any(|d| d.name == name) {
            continue;
        }

        let raw = caps[2].to_string();
        let mut dep = Dependency::runtime(name);
        dep.version = Some(raw.trim_end_matches("+incompatible").to_string());
        dep.version_constraint = Some(raw);
        if caps.get(3).is_some() {
            dep.scope = Some("indirect".to_string());
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

    const GO_MOD: &str = "module example.com/app\n\ngo 1.21\n\nrequire (\n\tgithub.com/gin-gonic/gin v1.9.1\n\tgithub.com/stretchr/testify v1.8.4 // indirect\n)\n\nrequire github.com/foo/bar v1.2.3+incompatible\n";

    #[test]
    fn test_require_block_and_single_line() {
        let deps = parse_go_mod(GO_MOD);
        assert_eq!(deps.len(), 3);

        let gin = deps
            .iter()
            .find(|d| d.name == "github.com/gin-gonic/gin")
            .unwrap();
        assert_eq!(gin.version.as_deref(), Some("v1.9.1"));
        assert!(gin.scope.is_none());
    }

    #[test]
    fn test_indirect_marker() {
        let deps = parse_go_mod(GO_MOD);
        let testify = deps
            .iter()
            .find(|d| d.name == "github.com/stretchr/testify")
            .unwrap();
        assert_eq!(testify.scope.as_deref(), Some("indirect"));
    }

    #[test]
    fn test_incompatible_suffix_stripped_from_version_only() {
        let deps = parse_go_mod(GO_MOD);
        let bar = deps.iter().find(|d| d.name == "github.com/foo/bar").unwrap();
        assert_eq!(bar.version.as_deref(), Some("v1.2.3"));
        assert_eq!(
            bar.version_constraint.as_deref(),
            Some("v1.2.3+incompatible")
        );
    }

    #[test]
    fn test_module_and_go_directives_ignored() {
        let deps = parse_go_mod("module example.com/app\n\ngo 1.21\n");
        assert!(deps.is_empty());
    }

    #[test]
    fn test_extract_from_directory() {
        let dir = TempDir::new().unwrap();
        stdfs::write(dir.path().join("go.mod"), GO_MOD).unwrap();
        let deps = GoExtractor.extract(dir.path()).unwrap();
        assert_eq!(deps.len(), 3);
    }
}
