//! Turning non-dotted source text into callables.
//!
//! Dotted names are resolved by the builder itself. Anything else (code
//! snippets) needs a [`SourceCompiler`]; [`SnippetTable`] is the registry
//! flavour, mapping exact source strings to pre-built callables.

use std::sync::Arc;

use dashmap::DashMap;

use qualname_core::error::{QualnameError, Result};

use crate::object::Callable;

pub trait SourceCompiler: Send + Sync {
    fn compile(&self, source: &str) -> Result<Arc<dyn Callable>>;
}

/// Exact-text lookup of known snippets.
#[derive(Default)]
pub struct SnippetTable {
    snippets: DashMap<String, Arc<dyn Callable>>,
}

impl SnippetTable {
    pub fn new() -> Self {
        Self {
            snippets: DashMap::new(),
        }
    }

    pub fn register(&self, source: impl Into<String>, callable: Arc<dyn Callable>) {
        self.snippets.insert(source.into(), callable);
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

impl SourceCompiler for SnippetTable {
    fn compile(&self, source: &str) -> Result<Arc<dyn Callable>> {
        self.snippets
            .get(source)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| QualnameError::SourceCompilation(format!("unknown snippet: {source:?}")))
    }
}

/// `pkg.sub.name`: non-empty identifier segments joined by dots.
pub(crate) fn is_dotted_name(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|seg| {
            let mut chars = seg.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_names() {
        assert!(is_dotted_name("mypkg.Widget"));
        assert!(is_dotted_name("single"));
        assert!(is_dotted_name("_p.v2"));
        assert!(!is_dotted_name("lambda x: x"));
        assert!(!is_dotted_name("a..b"));
        assert!(!is_dotted_name("2fast.x"));
        assert!(!is_dotted_name(""));
    }
}
