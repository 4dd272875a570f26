use super::LanguageSpec;
use std::sync::Arc;

/// Registry of language specs; the orchestrator iterates it and single
/// detectors look specs up by name.
#[derive(Clone)]
pub struct LanguageRegistry {
    specs: Vec<Arc<dyn LanguageSpec>>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::PythonSpec));
        registry.register(Arc::new(super::JavaScriptSpec));
        registry.register(Arc::new(super::TypeScriptSpec));
        registry.register(Arc::new(super::JavaSpec));
        registry.register(Arc::new(super::RubySpec));
        registry.register(Arc::new(super::GoSpec));
        registry.register(Arc::new(super::RustSpec));
        registry
    }

    pub fn register(&mut self, spec: Arc<dyn LanguageSpec>) {
        self.specs.push(spec);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn LanguageSpec>> {
        self.specs
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn LanguageSpec>> {
        self.specs.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|s| s.name()).collect()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
