//! qualname core: argument values, wire schemas, the row codec, and the
//! fully-qualified-named invocation envelope.
//!
//! This crate defines the wire-level contract and error surface shared by the
//! resolver/builder crate and by foreign peers. It carries no name resolution
//! or invocation logic so it can be reused by anything that only needs to
//! read or write payloads.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `QualnameError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod value;

/// Shared result type.
pub use error::{ErrorCode, QualnameError, Result};
pub use value::{Kwargs, Row, Value};
