//! Ruby language spec (Bundler projects)

use super::{toolchain_probe, LanguageSpec, ProbeSignal};
use crate::detection::analyzers::source_patterns::FrameworkPattern;
use crate::toolchain::CommandRunner;
use async_trait::async_trait;
use std::path::Path;

const FRAMEWORKS: &[FrameworkPattern] = &[
    FrameworkPattern {
        name: "rails",
        patterns: &[
            r"Rails\.application",
            r"class\s+\w+\s*<\s*ApplicationController",
            r"require\s+['\x22]rails",
        ],
    },
    FrameworkPattern {
        name: "sinatra",
        patterns: &[r"require\s+['\x22]sinatra", r"Sinatra::Base"],
    },
];

pub struct RubySpec;

#[async_trait]
impl LanguageSpec for RubySpec {
    fn name(&self) -> &'static str {
        "ruby"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["rb", "rake", "gemspec"]
    }

    fn config_files(&self) -> &'static [&'static str] {
        &["Gemfile", ".ruby-version"]
    }

    fn framework_patterns(&self) -> &'static [FrameworkPattern] {
        FRAMEWORKS
    }

    fn entry_point_markers(&self) -> &'static [(&'static str, &'static str)] {
        &[("config/application.rb", "rails")]
    }

    async fn low_confidence_probe(
        &self,
        _root: &Path,
        runner: &dyn CommandRunner,
    ) -> Option<ProbeSignal> {
        toolchain_probe(runner, "ruby", &["--version"], 0.3).await
    }
}
