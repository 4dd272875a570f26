//! Source-code pattern scanner
//!
//! Samples a bounded number of source files, infers each file's language
//! (extension first, content-pattern scoring as fallback), and matches an
//! optional framework-pattern table against the content. Pattern tables are
//! data: a new ecosystem is added by extending a table, not by new branches.

use super::language_for_extension;
use crate::detection::types::{SourceCodeObservation, UNKNOWN_LANGUAGE};
use crate::fs::{self, ScanLimits};
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Hard cap on sampled files regardless of caller options.
pub const MAX_SAMPLED_FILES: usize = 20;

/// An ordered list of regexes whose first match names a framework.
#[derive(Debug, Clone, Copy)]
pub struct FrameworkPattern {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
}

/// Characteristic idioms per language: import forms, declaration keywords,
/// entry-point shapes. Used only when the extension alone is ambiguous.
const LANGUAGE_PATTERNS: &[(&str, &[&str])] = &[
    (
        "python",
        &[
            r"(?m)^import\s+\w+",
            r"(?m)^from\s+\w+(?:\.\w+)*\s+import",
            r"(?m)^\s*def\s+\w+\s*\(",
            r#"if\s+__name__\s*==\s*['"]__main__['"]"#,
        ],
    ),
    (
        "javascript",
        &[
            r"(?m)\brequire\s*\(",
            r"module\.exports",
            r"(?m)^(?:const|let|var)\s+\w+\s*=",
            r"console\.log\s*\(",
        ],
    ),
    (
        "typescript",
        &[
            r"(?m)^\s*interface\s+\w+",
            r":\s*(?:string|number|boolean)\b",
            r"(?m)^export\s+(?:type|interface)\b",
            r"(?m)^import\s+.*\s+from\s+['\x22]",
        ],
    ),
    (
        "go",
        &[
            r"(?m)^package\s+\w+",
            r"(?m)^func\s+\w+\s*\(",
            r":=",
            r"(?m)^import\s+\(",
        ],
    ),
    (
        "rust",
        &[
            r"(?m)^\s*fn\s+\w+",
            r"let\s+mut\s+\w+",
            r"(?m)^use\s+\w+(?:::\w+)*",
            r"(?m)^\s*impl\s+",
        ],
    ),
    (
        "ruby",
        &[
            r"(?m)^require\s+['\x22]",
            r"(?m)^\s*def\s+\w+\s*$",
            r"(?m)^\s*class\s+\w+\s*<\s*\w+",
            r"(?m)^end\s*$",
        ],
    ),
    (
        "java",
        &[
            r"(?m)^\s*public\s+class\s+\w+",
            r"(?m)^import\s+java\.",
            r"public\s+static\s+void\s+main",
            r"(?m)^package\s+[\w.]+;",
        ],
    ),
];

/// Scan up to `max_files` source files under the given extensions.
pub fn analyze(
    root: &Path,
    extensions: &[&str],
    frameworks: &[FrameworkPattern],
    max_files: usize,
) -> Vec<SourceCodeObservation> {
    let cap = max_files.min(MAX_SAMPLED_FILES).max(1);
    let files = fs::list_project_files(root, &ScanLimits::default());

    let mut observations = Vec::new();
    for path in files {
        if observations.len() >= cap {
            break;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(extension) = fs::file_extension(filename) else {
            continue;
        };
        if !extensions.iter().any(|e| e.eq_ignore_ascii_case(&extension)) {
            continue;
        }
        let Ok(content) = fs::read_text_file(&path) else {
            continue;
        };

        let language = match language_for_extension(&extension) {
            Some(language) => language.to_string(),
            None => score_content_language(&content),
        };

        let (framework, matches) = match_frameworks(&content, frameworks);

        observations.push(SourceCodeObservation {
            path,
            language,
            framework,
            matches,
        });
    }

    debug!(
        root = %root.display(),
        sampled = observations.len(),
        "Source pattern scan completed"
    );

    observations
}

/// Score content against every language's pattern table; most total matches
/// wins, ties (including zero matches everywhere) resolve to "unknown".
pub fn score_content_language(content: &str) -> String {
    let mut best: Option<(&str, usize)> = None;
    let mut tied = false;

    for (language, patterns) in LANGUAGE_PATTERNS {
        let mut hits = 0usize;
        for pattern in *patterns {
            if let Ok(re) = Regex::new(pattern) {
                hits += re.find_iter(content).count();
            }
        }
        match best {
            Some((_, best_hits)) if hits > best_hits => {
                best = Some((language, hits));
                tied = false;
            }
            Some((_, best_hits)) if hits == best_hits && hits > 0 => {
                tied = true;
            }
            None => {
                best = Some((language, hits));
                tied = false;
            }
            _ => {}
        }
    }

    match best {
        Some((language, hits)) if hits > 0 && !tied => language.to_string(),
        _ => UNKNOWN_LANGUAGE.to_string(),
    }
}

/// First matching framework regex wins; all distinct pattern matches are
/// recorded for diagnostics.
fn match_frameworks(
    content: &str,
    frameworks: &[FrameworkPattern],
) -> (Option<String>, Vec<String>) {
    let mut framework = None;
    let mut matches = Vec::new();

    for entry in frameworks {
        for pattern in entry.patterns {
            let Ok(re) = Regex::new(pattern) else {
                continue;
            };
            if re.is_match(content) {
                if framework.is_none() {
                    framework = Some(entry.name.to_string());
                }
                let recorded = format!("{}:{}", entry.name, pattern);
                if !matches.contains(&recorded) {
                    matches.push(recorded);
                }
            }
        }
    }

    (framework, matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    const PY_FRAMEWORKS: &[FrameworkPattern] = &[
        FrameworkPattern {
            name: "django",
            patterns: &[r"from\s+django", r"import\s+django"],
        },
        FrameworkPattern {
            name: "flask",
            patterns: &[r"from\s+flask\s+import", r"Flask\(__name__\)"],
        },
    ];

    #[test]
    fn test_language_from_extension() {
        let dir = TempDir::new().unwrap();
        stdfs::write(dir.path().join("main.py"), "import os\n").unwrap();

        let observations = analyze(dir.path(), &["py"], &[], 20);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].language, "python");
    }

    #[test]
    fn test_first_framework_pattern_wins() {
        let dir = TempDir::new().unwrap();
        stdfs::write(
            dir.path().join("app.py"),
            "from django import forms\nfrom flask import Flask\n",
        )
        .unwrap();

        let observations = analyze(dir.path(), &["py"], PY_FRAMEWORKS, 20);
        assert_eq!(observations[0].framework.as_deref(), Some("django"));
        // Both hits are still recorded as diagnostics.
        assert!(observations[0].matches.len() >= 2);
    }

    #[test]
    fn test_sampling_cap() {
        let dir = TempDir::new().unwrap();
        for i in 0..30 {
            stdfs::write(dir.path().join(format!("m{}.py", i)), "import os\n").unwrap();
        }

        let observations = analyze(dir.path(), &["py"], &[], 50);
        assert_eq!(observations.len(), MAX_SAMPLED_FILES);

        let few = analyze(dir.path(), &["py"], &[], 5);
        assert_eq!(few.len(), 5);
    }

    #[test]
    fn test_score_content_python() {
        let content = "import os\nfrom sys import path\n\ndef main():\n    pass\n\nif __name__ == \"__main__\":\n    main()\n";
        assert_eq!(score_content_language(content), "python");
    }

    #[test]
    fn test_score_content_go() {
        let content = "package main\n\nimport (\n\t\"fmt\"\n)\n\nfunc main() {\n\tx := 1\n\tfmt.Println(x)\n}\n";
        assert_eq!(score_content_language(content), "go");
    }

    #[test]
    fn test_score_content_no_signal_is_unknown() {
        assert_eq!(score_content_language("plain prose, nothing else"), UNKNOWN_LANGUAGE);
        assert_eq!(score_content_language(""), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_unreadable_extension_filter() {
        let dir = TempDir::new().unwrap();
        stdfs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();

        let observations = analyze(dir.path(), &["py"], &[], 20);
        assert!(observations.is_empty());
    }
}
