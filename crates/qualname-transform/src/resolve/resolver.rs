//! Dotted-path resolution over the attribute and module namespaces.

use std::sync::Arc;

use qualname_core::error::{QualnameError, Result};

use super::module::ModuleRegistry;
use crate::object::Object;
use crate::policy::{Filter, FilterGuard};

/// Resolves `pkg.sub.Name` style references.
///
/// Walks the segments left to right keeping the accumulated prefix. At each
/// segment an attribute of the current object wins; only when there is no
/// current object, or it lacks the attribute, is the whole prefix imported as
/// a module. Every entry point checks the filter before touching either
/// namespace.
#[derive(Clone)]
pub struct Resolver {
    modules: Arc<ModuleRegistry>,
}

impl Resolver {
    pub fn new(modules: Arc<ModuleRegistry>) -> Self {
        Self { modules }
    }

    /// Resolve under the calling thread's active filter.
    pub fn resolve(&self, path: &str) -> Result<Object> {
        FilterGuard::check(path)?;
        self.walk(path)
    }

    /// Resolve under an explicit filter, ignoring the thread's active one.
    pub fn resolve_with(&self, filter: &Filter, path: &str) -> Result<Object> {
        filter.check(path)?;
        self.walk(path)
    }

    /// Traversal without a filter check. Only for dotted source text.
    pub(crate) fn walk(&self, path: &str) -> Result<Object> {
        let mut current: Option<Object> = None;
        let mut prefix = String::with_capacity(path.len());

        for segment in path.split('.') {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);

            let next = match current.as_ref().and_then(|o| o.attr(segment)) {
                Some(attr) => attr,
                None => Object::Module(self.modules.import(&prefix)?),
            };
            current = Some(next);
        }

        let resolved = current.ok_or_else(|| QualnameError::ResolutionFailure {
            prefix: path.to_string(),
            reason: "empty path".into(),
        })?;
        tracing::debug!(path = %path, kind = resolved.kind(), "resolved");
        Ok(resolved)
    }
}
