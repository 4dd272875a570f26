//! Python language spec (pip, poetry, pipenv projects)

use super::{LanguageSpec, ProbeSignal};
use crate::detection::analyzers::config_files::extract_version;
use crate::detection::analyzers::source_patterns::FrameworkPattern;
use crate::fs::{self, ScanLimits};
use crate::toolchain::CommandRunner;
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// Virtual-environment directory names probed for interpreter metadata.
const VENV_DIRS: &[&str] = &[".venv", "venv", "env", ".env"];

const SHEBANG_SAMPLE: usize = 10;

const FRAMEWORKS: &[FrameworkPattern] = &[
    FrameworkPattern {
        name: "django",
        patterns: &[r"from\s+django", r"import\s+django", r"INSTALLED_APPS"],
    },
    FrameworkPattern {
        name: "flask",
        patterns: &[r"from\s+flask\s+import", r"Flask\(__name__\)"],
    },
    FrameworkPattern {
        name: "fastapi",
        patterns: &[r"from\s+fastapi\s+import", r"FastAPI\("],
    },
];

pub struct PythonSpec;

#[async_trait]
impl LanguageSpec for PythonSpec {
    fn name(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py", "pyi", "pyw"]
    }

    fn config_files(&self) -> &'static [&'static str] {
        &[
            "pyproject.toml",
            "requirements.txt",
            "Pipfile",
            "setup.py",
            ".python-version",
        ]
    }

    fn framework_patterns(&self) -> &'static [FrameworkPattern] {
        FRAMEWORKS
    }

    fn entry_point_markers(&self) -> &'static [(&'static str, &'static str)] {
        &[("manage.py", "django"), ("app.py", "flask")]
    }

    fn fallback_runtime_version(&self, root: &Path) -> Option<String> {
        venv_version(root).or_else(|| shebang_version(root))
    }

    async fn low_confidence_probe(
        &self,
        root: &Path,
        _runner: &dyn CommandRunner,
    ) -> Option<ProbeSignal> {
        if let Some(version) = venv_version(root) {
            return Some(ProbeSignal {
                version: Some(version),
                confidence_floor: 0.4,
            });
        }
        shebang_version(root).map(|version| ProbeSignal {
            version: Some(version),
            confidence_floor: 0.3,
        })
    }
}

/// Read the interpreter version out of a virtual environment's
/// `pyvenv.cfg`. The version key has two spellings in the wild.
fn venv_version(root: &Path) -> Option<String> {
    for dir in VENV_DIRS {
        let cfg = root.join(dir).join("pyvenv.cfg");
        let Ok(content) = fs::read_text_file(&cfg) else {
            continue;
        };
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                "version" | "version_info" => {
                    if let Some(version) = extract_version(value) {
                        return Some(version);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Scan a bounded sample of source files for an executable-shebang version
/// suffix, e.g. `#!/usr/bin/env python3.11`.
fn shebang_version(root: &Path) -> Option<String> {
    let re = Regex::new(r"^#!.*python(\d+(?:\.\d+)*)").ok()?;
    let files = fs::list_project_files(root, &ScanLimits::default());

    for path in files
        .iter()
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("py"))
        .take(SHEBANG_SAMPLE)
    {
        let Ok(content) = fs::read_text_file(path) else {
            continue;
        };
        let first_line = content.lines().next().unwrap_or("");
        if let Some(caps) = re.captures(first_line) {
            return Some(caps[1].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::testing::MockCommandRunner;
    use std::fs as stdfs;
    use tempfile::TempDir;

    #[test]
    fn test_contract() {
        let spec = PythonSpec;
        assert_eq!(spec.name(), "python");
        assert!(spec.extensions().contains(&"py"));
        assert!(spec.config_files().contains(&"pyproject.toml"));
    }

    #[test]
    fn test_venv_version_standard_key() {
        let dir = TempDir::new().unwrap();
        stdfs::create_dir_all(dir.path().join(".venv")).unwrap();
        stdfs::write(
            dir.path().join(".venv/pyvenv.cfg"),
            "home = /usr/bin\nversion = 3.11.4\n",
        )
        .unwrap();

        assert_eq!(venv_version(dir.path()), Some("3.11.4".to_string()));
    }

    #[test]
    fn test_venv_version_alternate_key() {
        let dir = TempDir::new().unwrap();
        stdfs::create_dir_all(dir.path().join("venv")).unwrap();
        stdfs::write(
            dir.path().join("venv/pyvenv.cfg"),
            "home = /usr/bin\nversion_info = 3.12.1.final.0\n",
        )
        .unwrap();

        assert_eq!(venv_version(dir.path()), Some("3.12.1".to_string()));
    }

    #[test]
    fn test_shebang_version() {
        let dir = TempDir::new().unwrap();
        stdfs::write(
            dir.path().join("script.py"),
            "#!/usr/bin/env python3.11\nprint('hi')\n",
        )
        .unwrap();

        assert_eq!(shebang_version(dir.path()), Some("3.11".to_string()));
    }

    #[test]
    fn test_no_version_sources() {
        let dir = TempDir::new().unwrap();
        stdfs::write(dir.path().join("main.py"), "print('hi')\n").unwrap();

        let spec = PythonSpec;
        assert_eq!(spec.fallback_runtime_version(dir.path()), None);
    }

    #[tokio::test]
    async fn test_probe_prefers_venv_over_shebang() {
        let dir = TempDir::new().unwrap();
        stdfs::create_dir_all(dir.path().join(".venv")).unwrap();
        stdfs::write(dir.path().join(".venv/pyvenv.cfg"), "version = 3.11\n").unwrap();
        stdfs::write(
            dir.path().join("script.py"),
            "#!/usr/bin/env python3.9\n",
        )
        .unwrap();

        let spec = PythonSpec;
        let runner = MockCommandRunner::new();
        let signal = spec.low_confidence_probe(dir.path(), &runner).await.unwrap();
        assert_eq!(signal.version.as_deref(), Some("3.11"));
        assert_eq!(signal.confidence_floor, 0.4);
    }

    #[tokio::test]
    async fn test_probe_shebang_floor() {
        let dir = TempDir::new().unwrap();
        stdfs::write(
            dir.path().join("script.py"),
            "#!/usr/bin/env python3.9\n",
        )
        .unwrap();

        let spec = PythonSpec;
        let runner = MockCommandRunner::new();
        let signal = spec.low_confidence_probe(dir.path(), &runner).await.unwrap();
        assert_eq!(signal.confidence_floor, 0.3);
    }

    #[test]
    fn test_entry_point_marker_fallback() {
        let dir = TempDir::new().unwrap();
        stdfs::write(dir.path().join("manage.py"), "#!/usr/bin/env python\n").unwrap();

        let spec = PythonSpec;
        let framework = spec.detect_framework(dir.path(), None, None);
        assert_eq!(framework.as_deref(), Some("django"));
    }
}
