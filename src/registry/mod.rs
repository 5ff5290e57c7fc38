//! Config registry: named bindings, set tracking and ordered traversal.

mod binding;
mod set;

pub use binding::{Binding, Entry};
pub use set::ConfigSet;
