//! File-system boundary: recursive project walking and small read helpers
//!
//! The analyzers treat this module as a pure I/O surface. Walking skips
//! build-artifact directories up front so no analyzer ever sees dependency
//! caches, VCS metadata, or build outputs.

use anyhow::{Context, Result};
use ignore::{overrides::OverrideBuilder, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Directory names never descended into: dependency caches, VCS metadata,
/// build outputs, editor state.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".svn",
    ".hg",
    "target",
    "build",
    "dist",
    "out",
    "bin",
    "obj",
    "__pycache__",
    ".venv",
    "venv",
    "env",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".gradle",
    ".next",
    ".nuxt",
    "coverage",
    "vendor",
    ".idea",
    ".vscode",
];

/// File suffixes that mark build artifacts rather than authored sources:
/// minified assets, lockfiles, logs, source maps, temp/cache leftovers.
pub const EXCLUDED_SUFFIXES: &[&str] = &[
    ".min.js", ".min.css", ".map", ".lock", ".log", ".tmp", ".temp", ".cache", ".bak",
];

#[derive(Debug, Clone)]
pub struct ScanLimits {
    pub max_depth: usize,
    pub max_files: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_files: 2000,
        }
    }
}

/// Recursively list regular files under `root`, honoring the deny-list and
/// `.gitignore`, capped by `limits`.
pub fn list_project_files(root: &Path, limits: &ScanLimits) -> Vec<PathBuf> {
    let mut override_builder = OverrideBuilder::new(root);
    for excluded in EXCLUDED_DIRS {
        override_builder.add(&format!("!{}/", excluded)).ok();
    }
    let overrides = override_builder
        .build()
        .unwrap_or_else(|_| OverrideBuilder::new(root).build().unwrap());

    let mut files = Vec::new();
    for result in WalkBuilder::new(root)
        .max_depth(Some(limits.max_depth))
        .hidden(false)
        .git_ignore(true)
        .overrides(overrides)
        .build()
    {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();

        if !path.is_file() || is_excluded(root, path) {
            continue;
        }

        if files.len() >= limits.max_files {
            warn!(
                max_files = limits.max_files,
                "Reached file limit, stopping scan"
            );
            break;
        }
        files.push(path.to_path_buf());
    }
    files
}

/// True when a filename carries one of the build-artifact suffixes.
pub fn is_artifact_file(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    EXCLUDED_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Last `.`-delimited segment of a filename, lowercased. `None` for
/// extensionless and dotfile-only names.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}

pub fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn read_json_file(path: &Path) -> Result<serde_json::Value> {
    let content = read_text_file(path)?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn is_excluded(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    for component in relative.components() {
        if let Some(name) = component.as_os_str().to_str() {
            if EXCLUDED_DIRS.contains(&name) {
                return true;
            }
        }
    }
    false
}
