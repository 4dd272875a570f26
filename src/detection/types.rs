use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Canonical identifier returned when no language could be determined.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// The category of a single detection observation.
///
/// The weight attached to each kind is fixed: config files are the least
/// ambiguous signal (an explicit manifest naming the language), extension
/// histograms and source patterns are corroborating but noisier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceKind {
    FileExtension,
    ConfigFile,
    SourceCode,
    DirectoryStructure,
}

impl EvidenceKind {
    pub fn weight(&self) -> f64 {
        match self {
            EvidenceKind::FileExtension => 0.4,
            EvidenceKind::ConfigFile => 0.7,
            EvidenceKind::SourceCode => 0.3,
            EvidenceKind::DirectoryStructure => 0.2,
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvidenceKind::FileExtension => "file-extension",
            EvidenceKind::ConfigFile => "config-file",
            EvidenceKind::SourceCode => "source-code",
            EvidenceKind::DirectoryStructure => "directory-structure",
        };
        write!(f, "{}", name)
    }
}

/// One distinct file extension seen in the project tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileExtensionObservation {
    pub extension: String,
    pub count: usize,
    /// Share of scanned files carrying this extension, 0-100 with
    /// 2-decimal precision. Relative to the filtered total when a
    /// target-extension filter was active.
    pub percentage: f64,
    pub language: String,
}

/// Facts extracted from one configuration/manifest file at the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFileObservation {
    pub path: PathBuf,
    pub language: String,
    pub version: Option<String>,
    pub framework: Option<String>,
    /// Declared dependency names only. Versions come from the separate
    /// extraction subsystem.
    pub dependencies: Vec<String>,
}

/// Facts gathered from one sampled source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCodeObservation {
    pub path: PathBuf,
    pub language: String,
    pub framework: Option<String>,
    /// Distinct pattern matches, kept for diagnostics and never scored.
    pub matches: Vec<String>,
}

/// A directory name that marks a language's conventional layout.
///
/// Carried in the model for completeness; the current analyzers do not
/// produce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryStructureObservation {
    pub directory: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvidencePayload {
    FileExtension(FileExtensionObservation),
    ConfigFile(ConfigFileObservation),
    SourceCode(SourceCodeObservation),
    DirectoryStructure(DirectoryStructureObservation),
}

/// One weighted observation contributing to a language verdict.
///
/// Immutable once produced; owned by the detector that generated it for the
/// duration of one `detect` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvidence {
    pub kind: EvidenceKind,
    pub weight: f64,
    pub payload: EvidencePayload,
}

impl DetectionEvidence {
    pub fn new(payload: EvidencePayload) -> Self {
        let kind = match &payload {
            EvidencePayload::FileExtension(_) => EvidenceKind::FileExtension,
            EvidencePayload::ConfigFile(_) => EvidenceKind::ConfigFile,
            EvidencePayload::SourceCode(_) => EvidenceKind::SourceCode,
            EvidencePayload::DirectoryStructure(_) => EvidenceKind::DirectoryStructure,
        };
        Self {
            kind,
            weight: kind.weight(),
            payload,
        }
    }

    pub fn language(&self) -> &str {
        match &self.payload {
            EvidencePayload::FileExtension(o) => &o.language,
            EvidencePayload::ConfigFile(o) => &o.language,
            EvidencePayload::SourceCode(o) => &o.language,
            EvidencePayload::DirectoryStructure(o) => &o.language,
        }
    }

    pub fn framework(&self) -> Option<&str> {
        match &self.payload {
            EvidencePayload::ConfigFile(o) => o.framework.as_deref(),
            EvidencePayload::SourceCode(o) => o.framework.as_deref(),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match &self.payload {
            EvidencePayload::ConfigFile(o) => o.version.as_deref(),
            _ => None,
        }
    }
}

/// The output contract of one detector invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDetectionResult {
    /// Canonical lowercase identifier, e.g. "python", "javascript", "go".
    pub language: String,
    pub runtime_version: Option<String>,
    pub framework: Option<String>,
    /// Normalized belief in [0,1] that the project is written in `language`.
    pub confidence: f64,
}

impl LanguageDetectionResult {
    pub fn unknown() -> Self {
        Self {
            language: UNKNOWN_LANGUAGE.to_string(),
            runtime_version: None,
            framework: None,
            confidence: 0.0,
        }
    }

    pub fn validate(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}

impl fmt::Display for LanguageDetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0}%)", self.language, self.confidence * 100.0)?;
        if let Some(ref version) = self.runtime_version {
            write!(f, " runtime {}", version)?;
        }
        if let Some(ref framework) = self.framework {
            write!(f, " framework {}", framework)?;
        }
        Ok(())
    }
}

/// Tunables recognized by every per-language detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionOptions {
    pub cache_enabled: bool,
    pub confidence_threshold: f64,
    /// Reserved; current heuristics do not consult it.
    pub include_dev_files: bool,
    /// Caps how many source files the pattern scanner samples.
    pub max_files_to_analyze: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            confidence_threshold: 0.3,
            include_dev_files: false,
            max_files_to_analyze: 20,
        }
    }
}

impl DetectionOptions {
    /// Stable serialized form used as the options segment of a cache key.
    pub fn cache_fragment(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "default".to_string())
    }
}
