//! Policy layer: the glob allow-list and its scoped activation.
//!
//! Every resolution passes through [`FilterGuard::check`] (or an explicit
//! [`Filter`]) before any module is imported or attribute read.

pub mod filter;
pub mod guard;

pub use filter::Filter;
pub use guard::{FilterGuard, FilterScope};
