//! Shared runtime: configured filter, builder and payload router.
//!
//! Built once from config plus the application's module registry, then cloned
//! cheaply into whatever receives envelopes.

use std::sync::Arc;

use qualname_core::error::Result;
use qualname_core::protocol::{Envelope, InvocationSpec};

use crate::build::{InvocationBuilder, SourceCompiler};
use crate::config::QualnameConfig;
use crate::dispatch::{FullyQualifiedNamedHandler, PayloadRouter};
use crate::object::Transform;
use crate::policy::{Filter, FilterGuard};
use crate::resolve::{ModuleRegistry, Resolver};

#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

struct RuntimeInner {
    cfg: QualnameConfig,
    filter: Filter,
    builder: Arc<InvocationBuilder>,
    router: PayloadRouter,
}

impl Runtime {
    pub fn new(
        cfg: QualnameConfig,
        modules: Arc<ModuleRegistry>,
        compiler: Option<Arc<dyn SourceCompiler>>,
    ) -> Result<Self> {
        let filter = cfg.filter.to_filter()?;

        // filter <-> registry sanity check
        if let Some(root) = filter.pattern().and_then(literal_root) {
            let known = modules
                .registered_modules()
                .iter()
                .any(|m| m.split('.').next() == Some(root));
            if !known {
                tracing::warn!(pattern = %filter, root = %root, "filter pattern refers to no registered module");
            }
        }

        let mut builder = InvocationBuilder::new(Resolver::new(modules));
        if let Some(c) = compiler {
            builder = builder.with_compiler(c);
        }
        let builder = Arc::new(builder);

        let router = PayloadRouter::new();
        router.register(Arc::new(FullyQualifiedNamedHandler::new(Arc::clone(&builder))));

        Ok(Self {
            inner: Arc::new(RuntimeInner {
                cfg,
                filter,
                builder,
                router,
            }),
        })
    }

    pub fn cfg(&self) -> &QualnameConfig {
        &self.inner.cfg
    }

    pub fn filter(&self) -> &Filter {
        &self.inner.filter
    }

    pub fn router(&self) -> &PayloadRouter {
        &self.inner.router
    }

    /// Build `spec` with the configured filter active on this thread.
    pub fn build(&self, spec: InvocationSpec) -> Result<Arc<dyn Transform>> {
        let _scope = FilterGuard::activate(self.inner.filter.clone());
        self.inner.builder.build(spec)
    }

    /// Route `envelope` with the configured filter active on this thread.
    pub fn expand_envelope(&self, envelope: &Envelope) -> Result<Arc<dyn Transform>> {
        let _scope = FilterGuard::activate(self.inner.filter.clone());
        self.inner.router.route(envelope)
    }
}

/// Leading literal segment of a pattern (`mypkg` for `mypkg.*`), if any.
fn literal_root(pattern: &str) -> Option<&str> {
    let root = pattern.split('.').next()?;
    if root.is_empty() || root.contains(['*', '?', '[', '{', '\\']) {
        return None;
    }
    Some(root)
}
