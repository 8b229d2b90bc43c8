//! Invocation building: mode parsing, source loading and dispatch.

pub mod builder;
pub mod compiler;
pub mod fn_transform;
pub mod invocation;

pub use builder::InvocationBuilder;
pub use compiler::{SnippetTable, SourceCompiler};
pub use fn_transform::FnTransform;
pub use invocation::{Invocation, Source};
