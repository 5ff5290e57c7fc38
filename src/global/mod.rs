//! Process-wide default config set.
//!
//! The default set has no backing file until [`set_file`] is called. It is
//! created on first use and lives for the rest of the process. The free
//! functions here forward to it; code that wants isolation (tests, tools
//! with several independent config files) should own a [`ConfigSet`]
//! instead.

use std::path::PathBuf;

use chrono::Duration;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};

use crate::registry::{Binding, ConfigSet};
use crate::value::Handle;
use crate::Result;

static DEFAULT_SET: Lazy<Mutex<ConfigSet>> = Lazy::new(|| Mutex::new(ConfigSet::new()));

/// Lock and return the default set.
///
/// The lock is not reentrant: do not call other functions of this module
/// while holding the guard.
pub fn default_set() -> MutexGuard<'static, ConfigSet> {
    DEFAULT_SET.lock()
}

macro_rules! forward_define {
    ($var:ident, $new:ident, $ty:ty) => {
        #[doc = concat!("See [`ConfigSet::", stringify!($var), "`].")]
        pub fn $var(handle: &Handle<$ty>, name: &str, default: $ty, usage: &str) {
            default_set().$var(handle, name, default, usage);
        }

        #[doc = concat!("See [`ConfigSet::", stringify!($new), "`].")]
        pub fn $new(name: &str, default: $ty, usage: &str) -> Handle<$ty> {
            default_set().$new(name, default, usage)
        }
    };
}

forward_define!(bool_var, bool, bool);
forward_define!(int_var, int, isize);
forward_define!(int64_var, int64, i64);
forward_define!(uint_var, uint, usize);
forward_define!(uint64_var, uint64, u64);
forward_define!(float64_var, float64, f64);
forward_define!(string_var, string, String);
forward_define!(duration_var, duration, Duration);

/// Set a config in the default set.
///
/// # Errors
///
/// See [`ConfigSet::set`].
pub fn set(name: &str, text: &str) -> Result<()> {
    default_set().set(name, text)
}

/// Look up a config in the default set.
///
/// The binding is cloned; its value still points at the live storage.
#[must_use]
pub fn lookup(name: &str) -> Option<Binding> {
    default_set().lookup(name).cloned()
}

/// Visit every config of the default set, in name order.
///
/// `f` runs after the lock is released, so it may call back into this
/// module.
pub fn visit_all(mut f: impl FnMut(&Binding)) {
    let bindings: Vec<Binding> = default_set().formal.values().cloned().collect();
    bindings.iter().for_each(&mut f);
}

/// Visit the explicitly set configs of the default set, in name order.
pub fn visit(mut f: impl FnMut(&Binding)) {
    let bindings: Vec<Binding> = {
        let set = default_set();
        set.actual
            .iter()
            .filter_map(|name| set.formal.get(name).cloned())
            .collect()
    };
    bindings.iter().for_each(&mut f);
}

/// Number of explicitly set configs in the default set.
#[must_use]
pub fn count_set() -> usize {
    default_set().count_set()
}

/// Parse flag tokens into the default set.
///
/// # Errors
///
/// See [`ConfigSet::parse`].
pub fn parse<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    default_set().parse(args)
}

/// Parse the process arguments into the default set.
///
/// # Errors
///
/// See [`ConfigSet::parse`].
pub fn parse_env() -> Result<()> {
    default_set().parse_env()
}

/// Whether the default set has parsed a command line.
#[must_use]
pub fn parsed() -> bool {
    default_set().parsed()
}

/// Positional arguments of the default set.
#[must_use]
pub fn args() -> Vec<String> {
    default_set().args().to_vec()
}

/// The `i`th positional argument of the default set.
#[must_use]
pub fn arg(i: usize) -> Option<String> {
    default_set().arg(i).map(str::to_string)
}

/// Number of positional arguments of the default set.
#[must_use]
pub fn narg() -> usize {
    default_set().narg()
}

/// Attach a backing file to the default set.
pub fn set_file(path: impl Into<PathBuf>) {
    default_set().init(path);
}

/// See [`ConfigSet::load`].
pub fn load() {
    default_set().load();
}

/// See [`ConfigSet::save`].
pub fn save() {
    default_set().save();
}

/// See [`ConfigSet::print`].
pub fn print() {
    default_set().print();
}
