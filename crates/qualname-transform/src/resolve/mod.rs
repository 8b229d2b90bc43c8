//! Name resolution: the module registry and the dotted-path resolver.

pub mod module;
pub mod resolver;

pub use module::{Module, ModuleRegistry};
pub use resolver::Resolver;
