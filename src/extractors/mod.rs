//! Per-ecosystem dependency extraction
//!
//! Extractors parse manifest and lockfiles into a flat dependency list
//! without executing any project code. Each ecosystem follows a fixed
//! file-priority order (lockfile before manifest where both exist) and its
//! own manifest/lockfile merge rules; the asymmetry between ecosystems is
//! deliberate and mirrors each ecosystem's semantics.

pub mod go;
pub mod java;
pub mod node;
pub mod python;
pub mod registry;
pub mod ruby;
pub mod rust;

pub use go::GoExtractor;
pub use java::JavaExtractor;
pub use node::NodeExtractor;
pub use python::PythonExtractor;
pub use registry::{DependencyService, ExtractorRegistry};
pub use ruby::RubyExtractor;
pub use rust::RustExtractor;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Runtime,
    Development,
    Peer,
    Optional,
    Build,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencySource {
    Registry,
    Git,
    Path,
    Local,
}

/// One declared dependency. Unique by name within an extraction result;
/// no ordering guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    /// Exact resolved version when known (lockfile-derived or `==`-pinned).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Raw declared constraint, e.g. `^4.18.0` or `>=2.28,<3`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_constraint: Option<String>,
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DependencySource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Dependency {
    pub fn new(name: impl Into<String>, dep_type: DependencyType) -> Self {
        Self {
            name: name.into(),
            version: None,
            version_constraint: None,
            dep_type,
            source: None,
            source_url: None,
            extras: None,
            scope: None,
        }
    }

    pub fn runtime(name: impl Into<String>) -> Self {
        Self::new(name, DependencyType::Runtime)
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.version_constraint = Some(constraint.into());
        self
    }
}

/// Per-ecosystem extraction contract.
pub trait DependencyExtractor: Send + Sync {
    fn ecosystem(&self) -> &'static str;

    /// Languages whose verdict routes to this extractor.
    fn languages(&self) -> &'static [&'static str];

    fn extract(&self, root: &Path) -> Result<Vec<Dependency>>;
}

/// Extraction output surfaced to callers. Unlike detection, this path
/// carries non-fatal errors and warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyExtractionResult {
    pub language: String,
    pub ecosystem: Option<String>,
    pub dependencies: Vec<Dependency>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Lower-case a dependency name unless it is a scoped or namespaced
/// identifier (npm scopes, module paths, maven coordinates).
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.starts_with('@') || trimmed.contains('/') || trimmed.contains(':') {
        trimmed.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

/// Normalize names and trim version strings in place.
pub fn normalize_dependencies(dependencies: &mut [Dependency]) {
    for dep in dependencies.iter_mut() {
        dep.name = normalize_name(&dep.name);
        if let Some(version) = dep.version.take() {
            let trimmed = version.trim().to_string();
            dep.version = (!trimmed.is_empty()).then_some(trimmed);
        }
        if let Some(constraint) = dep.version_constraint.take() {
            let trimmed = constraint.trim().to_string();
            dep.version_constraint = (!trimmed.is_empty()).then_some(trimmed);
        }
    }
}
