//! Invocation dispatch: turns an invocation into a transform.

use std::sync::Arc;

use qualname_core::error::{QualnameError, Result};
use qualname_core::protocol::{InvocationSpec, CALLABLE_TOKEN, CONSTRUCTOR_TOKEN};

use super::compiler::{is_dotted_name, SourceCompiler};
use super::fn_transform::FnTransform;
use super::invocation::{Invocation, Source};
use crate::object::{Callable, Object, Transform};
use crate::policy::FilterGuard;
use crate::resolve::Resolver;

/// Builds transforms from invocation specs.
///
/// # Filter coverage in source modes
/// For `__constructor__` and `__callable__` the filter is checked against the
/// reserved token, not against the `source` that is eventually loaded. A
/// dotted `source` is looked up without a further check, so a filter that
/// admits the token admits any registered callable through it. This is
/// deliberate pending a product decision; do not tighten it here.
pub struct InvocationBuilder {
    resolver: Resolver,
    compiler: Option<Arc<dyn SourceCompiler>>,
}

impl InvocationBuilder {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            compiler: None,
        }
    }

    /// Compiler for source text that is not a dotted name.
    pub fn with_compiler(mut self, compiler: Arc<dyn SourceCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Build from the wire triple.
    pub fn build(&self, spec: InvocationSpec) -> Result<Arc<dyn Transform>> {
        let constructor = spec.constructor();
        if constructor == CONSTRUCTOR_TOKEN || constructor == CALLABLE_TOKEN {
            FilterGuard::check(constructor)?;
        }
        self.dispatch(Invocation::parse(spec)?)
    }

    /// Build from an already-tagged invocation (e.g. one carrying an
    /// in-process callable as its source).
    pub fn build_invocation(&self, invocation: Invocation) -> Result<Arc<dyn Transform>> {
        if !matches!(invocation, Invocation::DirectResolve { .. }) {
            FilterGuard::check(invocation.checked_name())?;
        }
        self.dispatch(invocation)
    }

    fn dispatch(&self, invocation: Invocation) -> Result<Arc<dyn Transform>> {
        match invocation {
            Invocation::DirectResolve { path, args, kwargs } => {
                tracing::debug!(%path, args = args.len(), kwargs = kwargs.len(), "direct-resolve");
                let target = self.resolver.resolve(&path)?;
                expect_transform(target.call(args, kwargs)?, &path)
            }
            Invocation::ConstructorSource {
                source,
                args,
                kwargs,
            } => {
                let func = self.load_source(source)?;
                tracing::debug!(source = func.name(), args = args.len(), kwargs = kwargs.len(), "constructor-source");
                expect_transform(func.call(args, kwargs)?, func.name())
            }
            Invocation::CallableSource {
                source,
                args,
                kwargs,
            } => {
                let func = self.load_source(source)?;
                tracing::debug!(source = func.name(), args = args.len(), kwargs = kwargs.len(), "callable-source");
                Ok(Arc::new(FnTransform::new(func, args, kwargs)))
            }
        }
    }

    fn load_source(&self, source: Source) -> Result<Arc<dyn Callable>> {
        let text = match source {
            Source::Callable(c) => return Ok(c),
            Source::Text(text) => text,
        };

        if is_dotted_name(&text) {
            let obj = self.resolver.walk(&text)?;
            return obj.clone().into_callable().ok_or_else(|| {
                QualnameError::InvocationFailure(format!(
                    "source {text:?} resolved to a {}, which is not callable",
                    obj.kind()
                ))
            });
        }

        match &self.compiler {
            Some(compiler) => compiler.compile(&text),
            None => Err(QualnameError::SourceCompilation(
                "no source compiler configured for non-dotted source text".into(),
            )),
        }
    }
}

fn expect_transform(obj: Object, origin: &str) -> Result<Arc<dyn Transform>> {
    let kind = obj.kind();
    obj.into_transform().ok_or_else(|| {
        QualnameError::InvocationFailure(format!("{origin} produced a {kind}, not a transform"))
    })
}
