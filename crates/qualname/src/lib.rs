//! Top-level facade crate for qualname.
//!
//! Re-exports the wire types and the transform library so applications can
//! depend on a single crate: `qualname::core` for values, schemas and the
//! invocation payload, `qualname::transform` for filtering, resolution and
//! building.

pub mod core {
    pub use qualname_core::*;
}

pub mod transform {
    pub use qualname_transform::*;
}

/// What an application needs to register modules and build transforms.
pub mod prelude {
    pub use qualname_core::protocol::{Envelope, InvocationSpec};
    pub use qualname_core::{Kwargs, QualnameError, Result, Row, Value};
    pub use qualname_transform::{
        Callable, Filter, FilterGuard, InvocationBuilder, Module, ModuleRegistry, Object, Resolver,
        Runtime, Transform,
    };
}
