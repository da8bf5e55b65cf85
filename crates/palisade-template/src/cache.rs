//! Per-specification template cache.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::TemplateError;
use crate::template::Template;

/// Interns compiled templates by their exact raw string.
///
/// Every distinct template string encountered while compiling a
/// specification is parsed once and shared; the number of entries is the
/// number of distinct raw strings seen. The cache belongs to one compiled
/// specification instance — a configuration reload builds a fresh cache
/// rather than mutating this one.
#[derive(Debug, Clone, Default)]
pub struct TemplateCache {
    templates: IndexMap<String, Arc<Template>>,
}

impl TemplateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `raw`, registering the result under the exact raw string.
    ///
    /// Empty input yields `Ok(None)` and registers nothing. A raw string
    /// already present returns the shared compiled template without
    /// re-parsing.
    pub fn compile(&mut self, raw: &str) -> Result<Option<Arc<Template>>, TemplateError> {
        if raw.is_empty() {
            return Ok(None);
        }
        if let Some(existing) = self.templates.get(raw) {
            return Ok(Some(Arc::clone(existing)));
        }
        let compiled = Arc::new(Template::parse(raw)?);
        self.templates.insert(raw.to_owned(), Arc::clone(&compiled));
        Ok(Some(compiled))
    }

    /// Looks up a previously compiled template by its exact raw string.
    #[must_use]
    pub fn get(&self, raw: &str) -> Option<&Arc<Template>> {
        self.templates.get(raw)
    }

    /// Returns the number of distinct cached templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterates over `(raw, compiled)` entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Template>)> {
        self.templates.iter().map(|(raw, t)| (raw.as_str(), t))
    }
}
