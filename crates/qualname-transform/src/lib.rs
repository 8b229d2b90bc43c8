//! qualname transform library entry.
//!
//! This crate wires the filter policy, module registry, resolver, invocation
//! builder and payload router into one stack. It is consumed by the inspection
//! binary (`main.rs`), by integration tests, and by applications that register
//! their own modules.
//!
//! Resolution, invocation and encode/decode all run synchronously on the
//! caller's thread.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod build;
pub mod builtins;
pub mod config;
pub mod dispatch;
pub mod object;
pub mod policy;
pub mod resolve;
pub mod runtime;

pub use build::{FnTransform, Invocation, InvocationBuilder, SnippetTable, Source, SourceCompiler};
pub use object::{native, native_transform, Callable, Object, Transform};
pub use policy::{Filter, FilterGuard, FilterScope};
pub use resolve::{Module, ModuleRegistry, Resolver};
pub use runtime::Runtime;
