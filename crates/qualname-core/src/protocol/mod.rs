//! Wire protocol: schemas, the row codec, envelopes, and the invocation payload.
//!
//! All decoders are panic-free: malformed bytes or schemas surface as
//! `QualnameError::CodecFailure` instead of panicking or indexing raw buffers,
//! so a process receiving foreign payloads stays up.

pub mod envelope;
pub mod invocation;
pub mod row;
pub mod schema;

pub use envelope::Envelope;
pub use invocation::{InvocationSpec, CALLABLE_TOKEN, CONSTRUCTOR_TOKEN, IDENTIFIER};
pub use schema::{Field, FieldType, Schema};
