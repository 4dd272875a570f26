//! TypeScript language spec

use super::LanguageSpec;
use crate::detection::analyzers::source_patterns::FrameworkPattern;
use async_trait::async_trait;

const FRAMEWORKS: &[FrameworkPattern] = &[
    FrameworkPattern {
        name: "nestjs",
        patterns: &[r"from\s+['\x22]@nestjs/", r"@Module\(\{"],
    },
    FrameworkPattern {
        name: "angular",
        patterns: &[r"from\s+['\x22]@angular/", r"@Component\(\{"],
    },
    FrameworkPattern {
        name: "express",
        patterns: &[r"from\s+['\x22]express['\x22]", r"express\(\)"],
    },
];

pub struct TypeScriptSpec;

#[async_trait]
impl LanguageSpec for TypeScriptSpec {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ts", "tsx", "mts", "cts"]
    }

    fn config_files(&self) -> &'static [&'static str] {
        &["tsconfig.json", "package.json"]
    }

    fn framework_patterns(&self) -> &'static [FrameworkPattern] {
        FRAMEWORKS
    }

    fn entry_point_markers(&self) -> &'static [(&'static str, &'static str)] {
        &[("angular.json", "angular"), ("nest-cli.json", "nestjs")]
    }
}
