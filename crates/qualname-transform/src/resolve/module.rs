//! Module namespace: a pre-populated registry of module initializers standing
//! in for dynamic import.
//!
//! Importing `a.b` first imports `a`, runs the initializer registered for
//! `a.b` on a fresh [`Module`], caches it, and binds it as attribute `b` on
//! `a`. Later imports of the same path return the cached module.
//!
//! Concurrent first imports of one path may run its initializer more than
//! once; the first module to reach the cache wins and every caller gets that
//! one. Initializers with side effects must tolerate this.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use qualname_core::error::{QualnameError, Result};

use crate::object::{native, Callable, Object};
use qualname_core::{Kwargs, Value};

/// A named attribute namespace.
pub struct Module {
    name: String,
    attrs: RwLock<BTreeMap<String, Object>>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<Object> {
        self.attrs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(name)
    }

    pub fn set_attr(&self, name: impl Into<String>, value: Object) {
        self.attrs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.into(), value);
    }

    /// Define a callable attribute from a closure. Its name is qualified with
    /// the module path.
    pub fn define<F>(&self, name: &str, f: F)
    where
        F: Fn(Vec<Value>, Kwargs) -> Result<Object> + Send + Sync + 'static,
    {
        let callable: Arc<dyn Callable> = native(format!("{}.{name}", self.name), f);
        self.set_attr(name, Object::Callable(callable));
    }

    pub fn attr_names(&self) -> Vec<String> {
        self.attrs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("attrs", &self.attr_names())
            .finish()
    }
}

type ModuleInit = Arc<dyn Fn(&Module) -> Result<()> + Send + Sync>;

/// Registry of importable modules.
#[derive(Default)]
pub struct ModuleRegistry {
    inits: DashMap<String, ModuleInit>,
    loaded: DashMap<String, Arc<Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            inits: DashMap::new(),
            loaded: DashMap::new(),
        }
    }

    /// Register the initializer for `path`. Replaces an earlier registration;
    /// an already-imported module is not re-run.
    pub fn register<F>(&self, path: impl Into<String>, init: F)
    where
        F: Fn(&Module) -> Result<()> + Send + Sync + 'static,
    {
        let path = path.into();
        if self.inits.insert(path.clone(), Arc::new(init)).is_some() {
            tracing::warn!(module = %path, "module initializer replaced");
        }
    }

    pub fn registered_modules(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inits.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        self.loaded.contains_key(path)
    }

    /// Import `path`, importing its parents first.
    pub fn import(&self, path: &str) -> Result<Arc<Module>> {
        if let Some(m) = self.loaded.get(path) {
            return Ok(Arc::clone(m.value()));
        }

        let parent = match path.rsplit_once('.') {
            Some((parent, leaf)) => Some((self.import(parent)?, leaf)),
            None => None,
        };

        let init = self
            .inits
            .get(path)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| QualnameError::ResolutionFailure {
                prefix: path.to_string(),
                reason: format!("no module named {path:?}"),
            })?;

        tracing::debug!(module = %path, "importing module");
        let fresh = Arc::new(Module::new(path));
        init(&fresh).map_err(|e| QualnameError::ResolutionFailure {
            prefix: path.to_string(),
            reason: format!("module initializer failed: {e}"),
        })?;

        let module = Arc::clone(self.loaded.entry(path.to_string()).or_insert(fresh).value());
        if let Some((parent, leaf)) = parent {
            if parent.has_attr(leaf) {
                tracing::debug!(module = %path, "submodule replaces existing attribute on parent");
            }
            parent.set_attr(leaf, Object::Module(Arc::clone(&module)));
        }
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn import_binds_submodule_on_parent() {
        let reg = ModuleRegistry::new();
        reg.register("a", |_| Ok(()));
        reg.register("a.b", |m| {
            m.set_attr("answer", Object::Value(Value::Int(42)));
            Ok(())
        });

        let b = reg.import("a.b").unwrap();
        let a = reg.import("a").unwrap();
        assert!(a.attr("b").unwrap().is_same(&Object::Module(Arc::clone(&b))));
        assert!(reg.is_loaded("a") && reg.is_loaded("a.b"));
    }

    #[test]
    fn submodule_import_replaces_parent_attribute() {
        let reg = ModuleRegistry::new();
        reg.register("p", |m| {
            m.set_attr("q", Object::Value(Value::Int(1)));
            Ok(())
        });
        reg.register("p.q", |_| Ok(()));

        let p = reg.import("p").unwrap();
        assert!(p.has_attr("q"));
        let q = reg.import("p.q").unwrap();
        assert!(p.attr("q").unwrap().is_same(&Object::Module(q)));
        assert_eq!(format!("{p:?}"), r#"Module { name: "p", attrs: ["q"] }"#);
    }

    #[test]
    fn import_is_cached() {
        let runs = Arc::new(AtomicUsize::new(0));
        let reg = ModuleRegistry::new();
        let counter = Arc::clone(&runs);
        reg.register("solo", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let first = reg.import("solo").unwrap();
        let second = reg.import("solo").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_parent_names_parent_prefix() {
        let reg = ModuleRegistry::new();
        reg.register("x.y", |_| Ok(()));
        match reg.import("x.y").err().unwrap() {
            QualnameError::ResolutionFailure { prefix, .. } => assert_eq!(prefix, "x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failing_initializer_is_not_cached() {
        let reg = ModuleRegistry::new();
        reg.register("broken", |_| Err(QualnameError::InvocationFailure("boom".into())));
        let err = reg.import("broken").err().unwrap();
        assert_eq!(err.code().as_str(), "RESOLUTION_FAILURE");
        assert!(err.to_string().contains("boom"));
        assert!(!reg.is_loaded("broken"));
    }
}
