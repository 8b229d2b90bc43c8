//! Resolved objects: modules, callables, transforms and plain values.
//!
//! `Callable` and `Transform` are object-safe so registries can hold them as
//! `Arc<dyn _>`. Closures are adapted with [`native`] and [`native_transform`].

use std::fmt;
use std::sync::Arc;

use qualname_core::error::{QualnameError, Result};
use qualname_core::{Kwargs, Value};

use crate::resolve::Module;

/// Something that can be invoked with positional and keyword arguments.
pub trait Callable: Send + Sync {
    fn name(&self) -> &str;
    fn call(&self, args: Vec<Value>, kwargs: Kwargs) -> Result<Object>;

    /// Attribute namespace (e.g. nested constructors). Empty by default.
    fn attr(&self, _name: &str) -> Option<Object> {
        None
    }
}

/// A composable pipeline step, applied to the upstream value.
pub trait Transform: Send + Sync {
    fn label(&self) -> &str;
    fn expand(&self, input: Value) -> Result<Value>;
}

/// Result of name resolution or invocation.
#[derive(Clone)]
pub enum Object {
    Module(Arc<Module>),
    Callable(Arc<dyn Callable>),
    Transform(Arc<dyn Transform>),
    Value(Value),
}

impl Object {
    /// Attribute lookup; `None` when the object does not expose `name`.
    pub fn attr(&self, name: &str) -> Option<Object> {
        match self {
            Object::Module(m) => m.attr(name),
            Object::Callable(c) => c.attr(name),
            Object::Value(Value::Row(row)) => row.get(name).cloned().map(Object::Value),
            Object::Transform(_) | Object::Value(_) => None,
        }
    }

    /// Invoke the object. Only callables can be invoked; their errors are
    /// returned unmodified.
    pub fn call(&self, args: Vec<Value>, kwargs: Kwargs) -> Result<Object> {
        match self {
            Object::Callable(c) => c.call(args, kwargs),
            other => Err(QualnameError::InvocationFailure(format!(
                "{} object is not callable",
                other.kind()
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Object::Module(_) => "module",
            Object::Callable(_) => "callable",
            Object::Transform(_) => "transform",
            Object::Value(_) => "value",
        }
    }

    /// Identity for shared objects, equality for plain values.
    pub fn is_same(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Module(a), Object::Module(b)) => Arc::ptr_eq(a, b),
            (Object::Callable(a), Object::Callable(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Object::Transform(a), Object::Transform(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Object::Value(a), Object::Value(b)) => a == b,
            _ => false,
        }
    }

    pub fn into_callable(self) -> Option<Arc<dyn Callable>> {
        match self {
            Object::Callable(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_transform(self) -> Option<Arc<dyn Transform>> {
        match self {
            Object::Transform(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Module(m) => write!(f, "Module({})", m.name()),
            Object::Callable(c) => write!(f, "Callable({})", c.name()),
            Object::Transform(t) => write!(f, "Transform({})", t.label()),
            Object::Value(v) => write!(f, "Value({v:?})"),
        }
    }
}

impl From<Value> for Object {
    fn from(v: Value) -> Self {
        Object::Value(v)
    }
}

struct NativeCallable<F> {
    name: String,
    f: F,
}

impl<F> Callable for NativeCallable<F>
where
    F: Fn(Vec<Value>, Kwargs) -> Result<Object> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: Vec<Value>, kwargs: Kwargs) -> Result<Object> {
        (self.f)(args, kwargs)
    }
}

/// Wrap a closure as a callable.
pub fn native<F>(name: impl Into<String>, f: F) -> Arc<dyn Callable>
where
    F: Fn(Vec<Value>, Kwargs) -> Result<Object> + Send + Sync + 'static,
{
    Arc::new(NativeCallable {
        name: name.into(),
        f,
    })
}

struct NativeTransform<F> {
    label: String,
    f: F,
}

impl<F> Transform for NativeTransform<F>
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn expand(&self, input: Value) -> Result<Value> {
        (self.f)(input)
    }
}

/// Wrap a closure as a transform.
pub fn native_transform<F>(label: impl Into<String>, f: F) -> Arc<dyn Transform>
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(NativeTransform {
        label: label.into(),
        f,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use qualname_core::Row;

    #[test]
    fn only_callables_are_callable() {
        let v = Object::Value(Value::Int(1));
        let err = v.call(vec![], Kwargs::new()).unwrap_err();
        assert_eq!(err.code().as_str(), "INVOCATION_FAILURE");

        let c = Object::Callable(native("double", |args, _| {
            Ok(Object::Value(Value::Int(args[0].as_int().unwrap_or(0) * 2)))
        }));
        let out = c.call(vec![Value::Int(21)], Kwargs::new()).unwrap();
        assert!(out.is_same(&Object::Value(Value::Int(42))));
    }

    #[test]
    fn row_values_expose_fields_as_attributes() {
        let obj = Object::Value(Value::Row(Row::new().with("x", 1)));
        assert!(obj.attr("x").unwrap().is_same(&Object::Value(Value::Int(1))));
        assert!(obj.attr("y").is_none());
    }

    #[test]
    fn identity_of_shared_callables() {
        let a = native("a", |_, _| Ok(Object::Value(Value::Null)));
        let b = native("a", |_, _| Ok(Object::Value(Value::Null)));
        let oa = Object::Callable(Arc::clone(&a));
        assert!(oa.is_same(&Object::Callable(a)));
        assert!(!oa.is_same(&Object::Callable(b)));
    }
}
