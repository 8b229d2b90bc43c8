//! Scoped filter activation.
//!
//! The active filter is **thread-local**. A scope opened on one thread is not
//! seen by any other thread, so concurrent scopes cannot observe each other's
//! pattern. The flip side: work handed to another thread runs under that
//! thread's filter (deny-all unless it activates one itself). Callers that
//! cannot guarantee this should pass an explicit [`Filter`] to
//! `Resolver::resolve_with` instead.
//!
//! Each [`FilterScope`] remembers the filter it replaced and puts it back when
//! dropped (normal exit, `?`, or unwinding), so nested scopes behave as a stack.

use std::cell::RefCell;
use std::marker::PhantomData;

use qualname_core::error::Result;

use super::filter::Filter;

thread_local! {
    static ACTIVE: RefCell<Filter> = RefCell::new(Filter::deny_all());
}

/// Entry point for the thread's active filter.
pub struct FilterGuard;

impl FilterGuard {
    /// Check `name` against the active filter.
    pub fn check(name: &str) -> Result<()> {
        ACTIVE.with(|active| active.borrow().check(name))
    }

    /// Snapshot of the active filter.
    pub fn current() -> Filter {
        ACTIVE.with(|active| active.borrow().clone())
    }

    /// Make `filter` active until the returned scope is dropped.
    #[must_use = "the filter is deactivated as soon as the scope is dropped"]
    pub fn activate(filter: Filter) -> FilterScope {
        let previous = ACTIVE.with(|active| active.replace(filter));
        tracing::debug!(filter = %FilterGuard::current(), previous = %previous, "filter activated");
        FilterScope {
            previous: Some(previous),
            _not_send: PhantomData,
        }
    }

    /// Run `f` with `pattern` active (`None` = deny all), restoring the
    /// previous filter afterwards.
    pub fn with_filter<T>(pattern: Option<&str>, f: impl FnOnce() -> T) -> Result<T> {
        let filter = Filter::from_option(pattern)?;
        let _scope = FilterGuard::activate(filter);
        Ok(f())
    }
}

/// Restores the previously active filter on drop. Not `Send`: it must be
/// dropped on the thread that created it.
pub struct FilterScope {
    previous: Option<Filter>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for FilterScope {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            // Thread-local storage may already be gone during thread teardown.
            let _restored = ACTIVE.try_with(|active| {
                active.replace(previous);
            });
        }
    }
}
