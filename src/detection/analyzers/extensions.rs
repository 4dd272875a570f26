//! File-extension histogram analyzer

use super::language_for_extension;
use crate::detection::types::{FileExtensionObservation, UNKNOWN_LANGUAGE};
use crate::fs::{self, ScanLimits};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Count file extensions under `root`, skipping build-artifact directories
/// and file suffixes. With `target_extensions` supplied, only matching
/// extensions are counted and percentages are relative to the filtered
/// total, not the whole tree. One observation per distinct extension,
/// sorted by count descending.
pub fn analyze(root: &Path, target_extensions: Option<&[&str]>) -> Vec<FileExtensionObservation> {
    let files = fs::list_project_files(root, &ScanLimits::default());

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for path in &files {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if fs::is_artifact_file(filename) {
            continue;
        }
        let Some(extension) = fs::file_extension(filename) else {
            continue;
        };
        if let Some(targets) = target_extensions {
            if !targets.iter().any(|t| t.eq_ignore_ascii_case(&extension)) {
                continue;
            }
        }
        *counts.entry(extension).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return Vec::new();
    }

    let mut observations: Vec<FileExtensionObservation> = counts
        .into_iter()
        .map(|(extension, count)| {
            let percentage = (count as f64 / total as f64 * 100.0 * 100.0).round() / 100.0;
            let language = language_for_extension(&extension)
                .unwrap_or(UNKNOWN_LANGUAGE)
                .to_string();
            FileExtensionObservation {
                extension,
                count,
                percentage,
                language,
            }
        })
        .collect();

    observations.sort_by(|a, b| b.count.cmp(&a.count).then(a.extension.cmp(&b.extension)));

    debug!(
        root = %root.display(),
        distinct = observations.len(),
        total,
        "Extension histogram built"
    );

    observations
}
