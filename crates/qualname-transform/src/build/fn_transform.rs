//! Function-applied-as-transform adapter.

use std::sync::Arc;

use qualname_core::error::{QualnameError, Result};
use qualname_core::{Kwargs, Value};

use crate::object::{Callable, Object, Transform};

/// Applies a plain function to the upstream value: `expand(input)` calls
/// `func(input, *args, **kwargs)` and expects a value back.
pub struct FnTransform {
    func: Arc<dyn Callable>,
    args: Vec<Value>,
    kwargs: Kwargs,
}

impl FnTransform {
    pub fn new(func: Arc<dyn Callable>, args: Vec<Value>, kwargs: Kwargs) -> Self {
        Self { func, args, kwargs }
    }
}

impl Transform for FnTransform {
    fn label(&self) -> &str {
        self.func.name()
    }

    fn expand(&self, input: Value) -> Result<Value> {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(input);
        args.extend(self.args.iter().cloned());
        match self.func.call(args, self.kwargs.clone())? {
            Object::Value(v) => Ok(v),
            other => Err(QualnameError::InvocationFailure(format!(
                "{} returned a {}, expected a value",
                self.func.name(),
                other.kind()
            ))),
        }
    }
}
