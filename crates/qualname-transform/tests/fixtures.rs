//! Module registry shared by integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use qualname_core::error::QualnameError;
use qualname_core::{Kwargs, Row, Value};
use qualname_transform::{native_transform, Module, ModuleRegistry, Object};

pub struct Fixture {
    pub modules: Arc<ModuleRegistry>,
    pub imports: Arc<AtomicUsize>,
}

impl Fixture {
    pub fn import_count(&self) -> usize {
        self.imports.load(Ordering::SeqCst)
    }
}

/// `Widget(*args, **kwargs)` builds a transform whose output records its
/// input and construction arguments.
fn widget(
    label: &'static str,
) -> impl Fn(Vec<Value>, Kwargs) -> qualname_core::Result<Object> + Send + Sync + 'static {
    move |args, kwargs| {
        let record = Row::new()
            .with("args", Value::List(args))
            .with("kwargs", Value::Map(kwargs));
        Ok(Object::Transform(native_transform(label, move |input| {
            Ok(Value::Row(record.clone().with("input", input)))
        })))
    }
}

/// Register `body` for `path`, counting every initializer run.
fn counted(path: &str, modules: &ModuleRegistry, imports: &Arc<AtomicUsize>, body: fn(&Module)) {
    let imports = Arc::clone(imports);
    modules.register(path, move |m| {
        imports.fetch_add(1, Ordering::SeqCst);
        body(m);
        Ok(())
    });
}

/// Layout:
/// - `mypkg`: `Widget`, `Exploder`, `NotATransform`, `double`
/// - `mypkg.sub`: `Widget`
/// - `otherpkg`: `Widget`
/// - `a`: attribute `b` (a row with `c = 1`), shadowing module `a.b` (`c = 2`)
/// - `a2`, `a2.b`: `c`, `x`
pub fn fixture() -> Fixture {
    let modules = Arc::new(ModuleRegistry::new());
    let imports = Arc::new(AtomicUsize::new(0));

    counted("mypkg", &modules, &imports, |m| {
        m.define("Widget", widget("mypkg.Widget"));
        m.define("Exploder", |_, _| Err(QualnameError::InvocationFailure("exploded".into())));
        m.define("NotATransform", |_, _| Ok(Object::Value(Value::Int(1))));
        m.define("double", |args, kwargs| {
            let factor = kwargs.get("factor").and_then(Value::as_int).unwrap_or(2);
            let extra = args.get(1).and_then(Value::as_int).unwrap_or(0);
            let items = args
                .first()
                .and_then(Value::as_list)
                .ok_or_else(|| QualnameError::InvocationFailure("double expects a list".into()))?;
            Ok(Object::Value(Value::List(
                items
                    .iter()
                    .map(|v| Value::Int(v.as_int().unwrap_or(0) * factor + extra))
                    .collect(),
            )))
        });
    });
    counted("mypkg.sub", &modules, &imports, |m| {
        m.define("Widget", widget("mypkg.sub.Widget"));
    });
    counted("otherpkg", &modules, &imports, |m| {
        m.define("Widget", widget("otherpkg.Widget"));
    });
    counted("a", &modules, &imports, |m| {
        m.set_attr("b", Object::Value(Value::Row(Row::new().with("c", 1))));
    });
    counted("a.b", &modules, &imports, |m| {
        m.set_attr("c", Object::Value(Value::Int(2)));
    });
    counted("a2", &modules, &imports, |_| {});
    counted("a2.b", &modules, &imports, |m| {
        m.set_attr("c", Object::Value(Value::Int(3)));
        m.set_attr("x", Object::Value(Value::Int(4)));
    });

    Fixture { modules, imports }
}
