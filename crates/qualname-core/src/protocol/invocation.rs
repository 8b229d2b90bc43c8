//! Fully-qualified-named invocation: the `(constructor, args, kwargs)` triple
//! and its envelope form.
//!
//! Wire shape (top-level row, exactly three fields):
//! - `constructor`: string
//! - `args`: row `arg0, arg1, ...` with per-value inferred types
//! - `kwargs`: row keyed by keyword name
//!
//! Empty argument lists produce empty sub-rows, never omitted fields. Decoding
//! tolerates peers that omit `args`/`kwargs` or send them as list/map.

use crate::error::{QualnameError, Result};
use crate::protocol::envelope::Envelope;
use crate::protocol::row::encode_row;
use crate::protocol::schema::{infer_type, FieldType, Schema};
use crate::value::{Kwargs, Row, Value};

/// Identifier of the fully-qualified-named invocation payload format.
pub const IDENTIFIER: &str = "qualname:transforms:fully_qualified_named:v1";

/// Reserved constructor: instantiate `source` directly.
pub const CONSTRUCTOR_TOKEN: &str = "__constructor__";

/// Reserved constructor: apply `source` as a function over the input.
pub const CALLABLE_TOKEN: &str = "__callable__";

/// A constructor reference (dotted path or reserved token) plus arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationSpec {
    constructor: String,
    args: Vec<Value>,
    kwargs: Kwargs,
}

impl InvocationSpec {
    pub fn new(constructor: impl Into<String>) -> Self {
        Self {
            constructor: constructor.into(),
            args: Vec::new(),
            kwargs: Kwargs::new(),
        }
    }

    pub fn from_parts(constructor: impl Into<String>, args: Vec<Value>, kwargs: Kwargs) -> Self {
        Self {
            constructor: constructor.into(),
            args,
            kwargs,
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Set a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    pub fn constructor(&self) -> &str {
        &self.constructor
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    pub fn into_parts(self) -> (String, Vec<Value>, Kwargs) {
        (self.constructor, self.args, self.kwargs)
    }

    /// Infer the payload schema, build the record and encode it.
    pub fn encode(&self) -> Result<Envelope> {
        let mut args_schema = Schema::new();
        let mut args_row = Row::new();
        for (ix, value) in self.args.iter().enumerate() {
            let name = format!("arg{ix}");
            args_schema = args_schema.with(name.clone(), infer_type(value)?);
            args_row.push(name, value.clone());
        }

        let mut kwargs_schema = Schema::new();
        let mut kwargs_row = Row::new();
        for (key, value) in &self.kwargs {
            kwargs_schema = kwargs_schema.with(key.clone(), infer_type(value)?);
            kwargs_row.push(key.clone(), value.clone());
        }

        let schema = Schema::new()
            .with("constructor", FieldType::Str)
            .with("args", FieldType::row(args_schema))
            .with("kwargs", FieldType::row(kwargs_schema));
        let record = Row::new()
            .with("constructor", self.constructor.as_str())
            .with("args", args_row)
            .with("kwargs", kwargs_row);

        let payload = encode_row(&schema, &record)?;
        tracing::debug!(
            constructor = %self.constructor,
            args = self.args.len(),
            kwargs = self.kwargs.len(),
            bytes = payload.len(),
            "encoded invocation"
        );
        Ok(Envelope::new(IDENTIFIER, schema, payload))
    }

    /// Decode an envelope tagged with [`IDENTIFIER`].
    pub fn decode(envelope: &Envelope) -> Result<Self> {
        if envelope.identifier != IDENTIFIER {
            return Err(QualnameError::codec(format!(
                "unexpected identifier: {}",
                envelope.identifier
            )));
        }
        let mut row = envelope.decode_row()?;

        let constructor = match row.take("constructor") {
            Some(Value::Str(s)) => s,
            Some(other) => {
                return Err(QualnameError::codec(format!(
                    "constructor must be a string, got {}",
                    other.kind()
                )))
            }
            None => return Err(QualnameError::codec("missing constructor field")),
        };

        let args = match row.take("args") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Row(r)) => r.into_values(),
            Some(Value::List(items)) => items,
            Some(other) => {
                return Err(QualnameError::codec(format!(
                    "args must be a row, got {}",
                    other.kind()
                )))
            }
        };

        let kwargs = match row.take("kwargs") {
            None | Some(Value::Null) => Kwargs::new(),
            Some(Value::Map(m)) => m,
            Some(Value::Row(r)) => r.into_map(),
            Some(other) => {
                return Err(QualnameError::codec(format!(
                    "kwargs must be a row, got {}",
                    other.kind()
                )))
            }
        };

        tracing::debug!(%constructor, args = args.len(), kwargs = kwargs.len(), "decoded invocation");
        Ok(Self::from_parts(constructor, args, kwargs))
    }
}
