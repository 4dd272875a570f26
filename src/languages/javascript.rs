//! JavaScript language spec (npm/yarn/pnpm projects)

use super::LanguageSpec;
use crate::detection::analyzers::source_patterns::FrameworkPattern;
use async_trait::async_trait;

const FRAMEWORKS: &[FrameworkPattern] = &[
    FrameworkPattern {
        name: "nextjs",
        patterns: &[r"from\s+['\x22]next[/'\x22]", r"require\(['\x22]next['\x22]\)"],
    },
    FrameworkPattern {
        name: "express",
        patterns: &[
            r"require\(['\x22]express['\x22]\)",
            r"from\s+['\x22]express['\x22]",
            r"express\(\)",
        ],
    },
    FrameworkPattern {
        name: "fastify",
        patterns: &[r"require\(['\x22]fastify['\x22]\)", r"fastify\(\{"],
    },
    FrameworkPattern {
        name: "react",
        patterns: &[r"from\s+['\x22]react['\x22]", r"React\.createElement"],
    },
];

pub struct JavaScriptSpec;

#[async_trait]
impl LanguageSpec for JavaScriptSpec {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["js", "jsx", "mjs", "cjs"]
    }

    fn config_files(&self) -> &'static [&'static str] {
        &["package.json"]
    }

    fn framework_patterns(&self) -> &'static [FrameworkPattern] {
        FRAMEWORKS
    }

    fn entry_point_markers(&self) -> &'static [(&'static str, &'static str)] {
        &[("next.config.js", "nextjs"), ("next.config.mjs", "nextjs")]
    }
}
