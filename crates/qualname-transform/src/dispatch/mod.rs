//! Payload routing by envelope identifier.
//!
//! Re-exports the router and handler trait so a receiving process can register
//! decoders for the payload formats it understands.

pub mod router;

pub use router::{FullyQualifiedNamedHandler, PayloadHandler, PayloadRouter};
