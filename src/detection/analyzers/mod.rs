//! Evidence analyzers: three independent scanners producing typed,
//! language-tagged observations from the project tree.

pub mod config_files;
pub mod extensions;
pub mod source_patterns;

/// Extension -> canonical language mapping shared by the extension and
/// source-code analyzers.
const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    ("py", "python"),
    ("pyi", "python"),
    ("pyw", "python"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("mts", "typescript"),
    ("cts", "typescript"),
    ("java", "java"),
    ("rb", "ruby"),
    ("rake", "ruby"),
    ("gemspec", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
];

/// Canonical language for a lowercased extension, `None` when unmapped.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    EXTENSION_LANGUAGES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
}
