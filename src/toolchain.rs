//! Toolchain probing through an injected command-runner port
//!
//! Shelling out to a language's own version command is a last-resort
//! detection signal. The port exists so probes can be mocked in tests and
//! disabled entirely in sandboxed environments. Every failure mode
//! (timeout, nonzero exit, missing executable) collapses uniformly to
//! "no signal".

use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Default upper bound on a single probe invocation.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Port for running external commands with a bounded timeout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Returns stdout on a zero exit within the timeout, `None` otherwise.
    async fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Option<String>;
}

/// Runner backed by real subprocesses. An optional cap bounds every
/// requested timeout, so a misconfigured caller can never block a probe
/// longer than the configured limit.
#[derive(Debug, Default)]
pub struct SystemCommandRunner {
    timeout_cap: Option<Duration>,
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self { timeout_cap: None }
    }

    pub fn with_timeout_cap(cap: Duration) -> Self {
        Self {
            timeout_cap: Some(cap),
        }
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Option<String> {
        let timeout = match self.timeout_cap {
            Some(cap) => timeout.min(cap),
            None => timeout,
        };
        let output = match tokio::time::timeout(timeout, Command::new(program).args(args).output())
            .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                debug!(program, error = %err, "Probe failed to spawn");
                return None;
            }
            Err(_) => {
                debug!(program, timeout_secs = timeout.as_secs(), "Probe timed out");
                return None;
            }
        };

        if !output.status.success() {
            debug!(program, status = ?output.status.code(), "Probe exited nonzero");
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Pull the first dotted version number out of probe output, e.g.
/// `go version go1.21.5 linux/amd64` -> `1.21.5`.
pub fn parse_probe_version(output: &str) -> Option<String> {
    let re = Regex::new(r"(\d+\.\d+(?:\.\d+)?)").ok()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;

    /// In-memory runner mapping program names to canned stdout.
    pub struct MockCommandRunner {
        responses: HashMap<String, String>,
    }

    impl MockCommandRunner {
        pub fn new() -> Self {
            Self {
                responses: HashMap::new(),
            }
        }

        pub fn respond(mut self, program: &str, stdout: &str) -> Self {
            self.responses.insert(program.to_string(), stdout.to_string());
            self
        }
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(&self, program: &str, _args: &[&str], _timeout: Duration) -> Option<String> {
            self.responses.get(program).cloned()
        }
    }
}
