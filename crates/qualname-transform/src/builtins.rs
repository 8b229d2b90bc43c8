//! Built-in transforms registered under `qualname.builtins`.
//!
//! Useful to prove routing end to end without application modules:
//! `qualname.builtins.Identity()` and `qualname.builtins.Limit(n)`.

use qualname_core::error::{QualnameError, Result};
use qualname_core::{Kwargs, Value};

use crate::object::{native_transform, Object};
use crate::resolve::ModuleRegistry;

pub const BUILTINS_MODULE: &str = "qualname.builtins";

/// Register the `qualname` package and its `builtins` module.
pub fn register(modules: &ModuleRegistry) {
    modules.register("qualname", |_| Ok(()));
    modules.register(BUILTINS_MODULE, |m| {
        m.define("Identity", |_, _| {
            Ok(Object::Transform(native_transform("Identity", Ok)))
        });
        m.define("Limit", |args, kwargs| {
            let n = limit_arg(&args, &kwargs)?;
            Ok(Object::Transform(native_transform(
                format!("Limit({n})"),
                move |input| match input {
                    Value::List(items) => Ok(Value::List(items.into_iter().take(n).collect())),
                    other => Err(QualnameError::InvocationFailure(format!(
                        "Limit expects a list input, got {}",
                        other.kind()
                    ))),
                },
            )))
        });
        Ok(())
    });
}

fn limit_arg(args: &[Value], kwargs: &Kwargs) -> Result<usize> {
    let raw = args.first().or_else(|| kwargs.get("n"));
    match raw.and_then(Value::as_int) {
        Some(n) => usize::try_from(n)
            .map_err(|_| QualnameError::InvocationFailure(format!("Limit(n) needs n >= 0, got {n}"))),
        None => Err(QualnameError::MissingArgument("Limit(n) needs an integer n".into())),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use super::*;
    use crate::policy::Filter;
    use crate::resolve::Resolver;

    #[test]
    fn limit_truncates_lists() {
        let modules = Arc::new(ModuleRegistry::new());
        register(&modules);
        let resolver = Resolver::new(modules);
        let filter = Filter::new("qualname.builtins.*").unwrap();

        let limit = resolver.resolve_with(&filter, "qualname.builtins.Limit").unwrap();
        let t = limit
            .call(vec![Value::Int(2)], Kwargs::new())
            .unwrap()
            .into_transform()
            .unwrap();
        assert_eq!(t.label(), "Limit(2)");
        let out = t
            .expand(Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
            .unwrap();
        assert_eq!(out, Value::List(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn limit_rejects_negative() {
        let err = limit_arg(&[Value::Int(-1)], &Kwargs::new()).unwrap_err();
        assert_eq!(err.code().as_str(), "INVOCATION_FAILURE");
    }
}
