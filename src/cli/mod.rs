//! Command-line interface
//!
//! Thin transport layer over the detection orchestrator and dependency
//! service. Results go to stdout (text or a JSON envelope), logs to
//! stderr. Errors caught at the orchestrator boundary are rendered as a
//! structured envelope, never as a panic.

use crate::cache::DetectionCache;
use crate::config::ProbeConfig;
use crate::detection::DetectionOrchestrator;
use crate::extractors::{DependencyService, ExtractorRegistry};
use crate::languages::LanguageRegistry;
use crate::toolchain::SystemCommandRunner;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "repoprobe", version, about = "Project language and dependency inspection")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect the project's language, runtime version, and framework
    Detect(DetectArgs),
    /// Extract the project's declared dependencies
    Deps(DepsArgs),
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Path to the project directory
    pub path: PathBuf,

    /// Run a single language's detector instead of the full orchestrator
    #[arg(long)]
    pub language: Option<String>,

    /// Emit a JSON envelope instead of text
    #[arg(long)]
    pub json: bool,

    /// Bypass the detection cache
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Debug, Args)]
pub struct DepsArgs {
    /// Path to the project directory
    pub path: PathBuf,

    /// Emit a JSON envelope instead of text
    #[arg(long)]
    pub json: bool,
}

/// Well-formed response envelope handed to the transport layer.
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ResponseEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn render(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| r#"{"success":false,"error":"serialization failed"}"#.to_string())
    }
}

/// Build the orchestrator from process configuration: cache directory and
/// probe timeout both come from `REPOPROBE_*` settings.
fn build_orchestrator(config: &ProbeConfig) -> DetectionOrchestrator {
    DetectionOrchestrator::new(
        LanguageRegistry::with_defaults(),
        Arc::new(SystemCommandRunner::with_timeout_cap(config.probe_timeout)),
        Arc::new(DetectionCache::new(config.cache_dir.clone())),
    )
}

pub async fn handle_detect(args: &DetectArgs, config: &ProbeConfig) -> i32 {
    let orchestrator = build_orchestrator(config);

    let outcome = match &args.language {
        Some(language) => {
            let mut options = config.detection_options();
            options.cache_enabled = options.cache_enabled && !args.no_cache;
            match orchestrator.detect_single(language, &args.path, &options).await {
                Ok(Some(result)) => Ok(result),
                Ok(None) => Err(format!("unsupported language: {}", language)),
                Err(err) => Err(err.to_string()),
            }
        }
        None => orchestrator
            .detect_language(&args.path)
            .await
            .map_err(|err| err.to_string()),
    };

    match outcome {
        Ok(result) => {
            if args.json {
                println!("{}", ResponseEnvelope::ok(&result).render());
            } else {
                println!("{}", result);
            }
            0
        }
        Err(message) => {
            if args.json {
                println!("{}", ResponseEnvelope::<()>::fail(message.as_str()).render());
            } else {
                eprintln!("Error: {}", message);
            }
            1
        }
    }
}

pub async fn handle_deps(args: &DepsArgs, config: &ProbeConfig) -> i32 {
    let service =
        DependencyService::new(build_orchestrator(config), ExtractorRegistry::with_defaults());

    match service.extract_dependencies(&args.path).await {
        Ok(result) => {
            if args.json {
                println!("{}", ResponseEnvelope::ok(&result).render());
            } else {
                println!(
                    "{} ({} dependencies)",
                    result.language,
                    result.dependencies.len()
                );
                for dep in &result.dependencies {
                    let version = dep
                        .version
                        .as_deref()
                        .or(dep.version_constraint.as_deref())
                        .unwrap_or("*");
                    println!("  {} {} [{:?}]", dep.name, version, dep.dep_type);
                }
                for warning in &result.warnings {
                    eprintln!("warning: {}", warning);
                }
            }
            0
        }
        Err(err) => {
            if args.json {
                println!("{}", ResponseEnvelope::<()>::fail(err.to_string()).render());
            } else {
                eprintln!("Error: {}", err);
            }
            1
        }
    }
}
