//! Tagged invocation: the wire triple with its mode made explicit.

use std::fmt;
use std::sync::Arc;

use qualname_core::error::{QualnameError, Result};
use qualname_core::protocol::{InvocationSpec, CALLABLE_TOKEN, CONSTRUCTOR_TOKEN};
use qualname_core::{Kwargs, Value};

use crate::object::Callable;

/// Where the callable of a source-mode invocation comes from.
#[derive(Clone)]
pub enum Source {
    /// Source text: a dotted name, or code for a `SourceCompiler`.
    Text(String),
    /// An in-process callable (cannot cross the wire).
    Callable(Arc<dyn Callable>),
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Source::Callable(c) => f.debug_tuple("Callable").field(&c.name()).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Invocation {
    /// Resolve `path` and call it with the arguments.
    DirectResolve {
        path: String,
        args: Vec<Value>,
        kwargs: Kwargs,
    },
    /// Call `source` with the arguments.
    ConstructorSource {
        source: Source,
        args: Vec<Value>,
        kwargs: Kwargs,
    },
    /// Apply `source` as a function over the input, with the arguments.
    CallableSource {
        source: Source,
        args: Vec<Value>,
        kwargs: Kwargs,
    },
}

impl Invocation {
    /// Interpret a wire triple.
    ///
    /// For the two source modes `source` is the first positional argument;
    /// only when there are none is it taken from the `source` keyword.
    pub fn parse(spec: InvocationSpec) -> Result<Self> {
        let (constructor, args, kwargs) = spec.into_parts();
        match constructor.as_str() {
            CONSTRUCTOR_TOKEN => {
                let (source, args, kwargs) = split_source(args, kwargs)?;
                Ok(Invocation::ConstructorSource {
                    source,
                    args,
                    kwargs,
                })
            }
            CALLABLE_TOKEN => {
                let (source, args, kwargs) = split_source(args, kwargs)?;
                Ok(Invocation::CallableSource {
                    source,
                    args,
                    kwargs,
                })
            }
            _ => Ok(Invocation::DirectResolve {
                path: constructor,
                args,
                kwargs,
            }),
        }
    }

    /// The name checked against the filter: the path for direct resolution,
    /// the reserved token for the source modes.
    pub fn checked_name(&self) -> &str {
        match self {
            Invocation::DirectResolve { path, .. } => path,
            Invocation::ConstructorSource { .. } => CONSTRUCTOR_TOKEN,
            Invocation::CallableSource { .. } => CALLABLE_TOKEN,
        }
    }
}

fn split_source(mut args: Vec<Value>, mut kwargs: Kwargs) -> Result<(Source, Vec<Value>, Kwargs)> {
    let raw = if args.is_empty() {
        kwargs.remove("source").ok_or_else(|| {
            QualnameError::MissingArgument(
                "source required as first positional argument or `source` keyword".into(),
            )
        })?
    } else {
        args.remove(0)
    };
    match raw {
        Value::Str(text) => Ok((Source::Text(text), args, kwargs)),
        other => Err(QualnameError::MissingArgument(format!(
            "source must be source text, got {}",
            other.kind()
        ))),
    }
}
