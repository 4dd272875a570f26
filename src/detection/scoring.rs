//! Confidence scoring over detection evidence
//!
//! Evidence either fires or is absent; each item contributes a fixed
//! per-kind weight. The score is the weighted mean of item scores (always
//! 1.0 today) minus a flat penalty when the evidence set spans more than one
//! language, clamped to [0,1].

use super::types::{DetectionEvidence, EvidenceKind, UNKNOWN_LANGUAGE};
use std::collections::HashSet;

/// Flat deduction applied once when evidence names more than one language.
/// Only this single conflict type is checked; the penalty does not grow with
/// the number of extra languages.
const CONFLICT_PENALTY: f64 = 0.2;

/// Combine evidence into a confidence in [0,1]. Empty evidence scores 0.
pub fn calculate_confidence_score(evidence: &[DetectionEvidence]) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }

    let total_weight: f64 = evidence.iter().map(|e| e.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }

    // Item score is always 1.0: an observation either fired or was never
    // produced, it carries no sub-confidence of its own.
    let weighted_sum: f64 = evidence.iter().map(|e| e.weight * 1.0).sum();
    let mut score = weighted_sum / total_weight;

    if has_language_conflict(evidence) {
        score -= CONFLICT_PENALTY;
    }

    score.clamp(0.0, 1.0)
}

/// Framework attached to the highest-weight evidence item carrying one.
pub fn primary_framework(evidence: &[DetectionEvidence]) -> Option<String> {
    evidence
        .iter()
        .filter(|e| e.framework().is_some())
        .max_by(|a, b| {
            a.weight
                .partial_cmp(&b.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .and_then(|e| e.framework().map(String::from))
}

/// Runtime version attached to the highest-weight config-file evidence.
pub fn primary_runtime_version(evidence: &[DetectionEvidence]) -> Option<String> {
    evidence
        .iter()
        .filter(|e| e.kind == EvidenceKind::ConfigFile && e.version().is_some())
        .max_by(|a, b| {
            a.weight
                .partial_cmp(&b.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .and_then(|e| e.version().map(String::from))
}

/// True when the evidence names more than one distinct language. The
/// "unknown" pseudo-language never counts toward distinctness.
fn has_language_conflict(evidence: &[DetectionEvidence]) -> bool {
    let languages: HashSet<&str> = evidence
        .iter()
        .map(|e| e.language())
        .filter(|l| !l.is_empty() && *l != UNKNOWN_LANGUAGE)
        .collect();
    languages.len() > 1
}
