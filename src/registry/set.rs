//! The config registry.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::Duration;

use super::binding::{Binding, Entry};
use crate::value::{Handle, Value};
use crate::{Error, Result};

/// Generates the `*_var` (bind caller storage) and plain (allocate storage)
/// definition methods for one value kind.
macro_rules! define_kind {
    ($var:ident, $new:ident, $variant:ident, $ty:ty, $label:literal) => {
        #[doc = concat!("Define a ", $label, " config stored in `handle`, which is reset to `default`.")]
        ///
        /// # Panics
        ///
        /// Panics if `name` is already registered.
        pub fn $var(&mut self, handle: &Handle<$ty>, name: &str, default: $ty, usage: &str) {
            handle.set(default);
            self.register(Value::$variant(handle.clone()), name, usage);
        }

        #[doc = concat!("Define a ", $label, " config and return a handle to its storage.")]
        ///
        /// # Panics
        ///
        /// Panics if `name` is already registered.
        pub fn $new(&mut self, name: &str, default: $ty, usage: &str) -> Handle<$ty> {
            let handle = Handle::new(default);
            self.register(Value::$variant(handle.clone()), name, usage);
            handle
        }
    };
}

/// A set of named configs, optionally backed by a file.
///
/// Names are unique. Traversal is always in lexicographic name order.
/// A `ConfigSet` carries no internal locking; share it behind a mutex if it
/// is mutated from several threads (see [`crate::global`]).
#[derive(Debug, Default)]
pub struct ConfigSet {
    pub(crate) path: Option<PathBuf>,
    pub(crate) formal: BTreeMap<String, Binding>,
    pub(crate) actual: BTreeSet<String>,
    pub(crate) args: Vec<String>,
    pub(crate) parsed: bool,
    pub(crate) strict: bool,
}

impl ConfigSet {
    /// Create an empty set with no backing file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set backed by `path`.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Reject unknown names instead of auto-registering them.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether unknown names are rejected.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Attach (or replace) the backing file.
    pub fn init(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Backing file, if any.
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Register `value` under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. Two configs with one name is
    /// a programming error; use [`ConfigSet::try_register`] to recover.
    pub fn register(&mut self, value: Value, name: &str, usage: &str) {
        if let Err(err) = self.try_register(value, name, usage) {
            tracing::error!(%err, "duplicate config registration");
            panic!("{err}");
        }
    }

    /// Register `value` under `name`, failing if the name is taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Redefined`] if `name` is already registered. The
    /// existing binding is left untouched.
    pub fn try_register(&mut self, value: Value, name: &str, usage: &str) -> Result<()> {
        if self.formal.contains_key(name) {
            return Err(Error::redefined(name, self.path.clone()));
        }
        self.formal
            .insert(name.to_string(), Binding::new(value, name, usage));
        Ok(())
    }

    define_kind!(bool_var, bool, Bool, bool, "bool");
    define_kind!(int_var, int, Int, isize, "int");
    define_kind!(int64_var, int64, Int64, i64, "int64");
    define_kind!(uint_var, uint, Uint, usize, "uint");
    define_kind!(uint64_var, uint64, Uint64, u64, "uint64");
    define_kind!(float64_var, float64, Float64, f64, "float64");
    define_kind!(string_var, string, Str, String, "string");
    define_kind!(duration_var, duration, Duration, Duration, "duration");

    /// Set the named config from text.
    ///
    /// An unknown name is registered as a new string config holding `text`
    /// (unless the set is strict). Auto-registered configs do not count as
    /// explicitly set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `text` is invalid for the config's type,
    /// in which case neither the value nor the set-tracking changes, and
    /// [`Error::UnknownConfig`] for unknown names on a strict set.
    pub fn set(&mut self, name: &str, text: &str) -> Result<()> {
        let Some(binding) = self.formal.get(name) else {
            if self.strict {
                return Err(Error::UnknownConfig(name.to_string()));
            }
            self.string(name, text.to_string(), "");
            tracing::info!(name, value = text, "added config (string)");
            return Ok(());
        };

        binding.value.parse_and_store(text)?;
        self.actual.insert(name.to_string());
        Ok(())
    }

    /// Look up a config by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.formal.get(name)
    }

    /// Whether the named config was explicitly set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.actual.contains(name)
    }

    /// Call `f` for every config, in name order.
    pub fn visit_all(&self, mut f: impl FnMut(&Binding)) {
        self.formal.values().for_each(&mut f);
    }

    /// Call `f` for every explicitly set config, in name order.
    pub fn visit(&self, mut f: impl FnMut(&Binding)) {
        self.actual
            .iter()
            .filter_map(|name| self.formal.get(name))
            .for_each(&mut f);
    }

    /// Number of explicitly set configs.
    #[must_use]
    pub fn count_set(&self) -> usize {
        self.actual.len()
    }

    /// Number of registered configs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formal.len()
    }

    /// Whether no configs are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formal.is_empty()
    }

    /// Snapshot of every config, in name order.
    #[must_use]
    pub fn entries(&self) -> Vec<Entry> {
        self.formal
            .values()
            .map(|b| b.entry(self.actual.contains(&b.name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;

    #[test]
    fn test_define_returns_live_handle() {
        let mut set = ConfigSet::new();
        let port = set.uint64("port", 8080, "listen port");
        assert_eq!(port.get(), 8080);
        set.set("port", "0x1F90").unwrap();
        assert_eq!(port.get(), 8080);
        set.set("port", "9090").unwrap();
        assert_eq!(port.get(), 9090);
    }

    #[test]
    fn test_var_resets_storage_to_default() {
        let mut set = ConfigSet::new();
        let h = Handle::new(-1isize);
        set.int_var(&h, "depth", 3, "");
        assert_eq!(h.get(), 3);
        assert_eq!(set.lookup("depth").unwrap().default_text, "3");
    }

    #[test]
    #[should_panic(expected = "config redefined: name")]
    fn test_duplicate_registration_panics() {
        let mut set = ConfigSet::new();
        set.string("name", String::new(), "");
        set.bool("name", false, "");
    }

    #[test]
    #[should_panic(expected = "app.conf config redefined: name")]
    fn test_duplicate_registration_names_file() {
        let mut set = ConfigSet::with_file("app.conf");
        set.string("name", String::new(), "");
        set.string("name", String::new(), "");
    }

    #[test]
    fn test_try_register_keeps_original() {
        let mut set = ConfigSet::new();
        let first = set.int64("n", 1, "first");
        let err = set
            .try_register(Value::Int64(Handle::new(2)), "n", "second")
            .unwrap_err();
        assert!(matches!(err, Error::Redefined { ref name, .. } if name == "n"));
        assert_eq!(set.lookup("n").unwrap().usage, "first");
        set.set("n", "5").unwrap();
        assert_eq!(first.get(), 5);
    }

    #[test]
    fn test_distinct_names_never_conflict() {
        let mut set = ConfigSet::new();
        set.bool("a", true, "");
        set.int("b", 1, "");
        set.int64("c", 1, "");
        set.uint("d", 1, "");
        set.uint64("e", 1, "");
        set.float64("f", 1.0, "");
        set.string("g", "x".to_string(), "");
        set.duration("h", Duration::seconds(1), "");
        assert_eq!(set.len(), 8);
        assert_eq!(set.count_set(), 0);
    }

    #[test]
    fn test_set_unknown_auto_registers_string() {
        let mut set = ConfigSet::new();
        set.set("colour", "blue").unwrap();
        let binding = set.lookup("colour").unwrap();
        assert_eq!(binding.kind(), Kind::String);
        assert_eq!(binding.current(), "blue");
        assert_eq!(binding.default_text, "blue");
        assert!(!set.is_set("colour"));
        assert_eq!(set.count_set(), 0);
    }

    #[test]
    fn test_set_unknown_after_auto_registration_is_tracked() {
        let mut set = ConfigSet::new();
        set.set("colour", "blue").unwrap();
        set.set("colour", "red").unwrap();
        assert!(set.is_set("colour"));
        assert_eq!(set.lookup("colour").unwrap().default_text, "blue");
    }

    #[test]
    fn test_strict_rejects_unknown() {
        let mut set = ConfigSet::new().strict(true);
        let err = set.set("colour", "blue").unwrap_err();
        assert!(matches!(err, Error::UnknownConfig(ref n) if n == "colour"));
        assert!(set.lookup("colour").is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn test_invalid_text_leaves_state_unchanged() {
        let mut set = ConfigSet::new();
        let n = set.int("n", 7, "");
        let err = set.set("n", "seven").unwrap_err();
        assert!(err.is_parse());
        assert_eq!(n.get(), 7);
        assert!(!set.is_set("n"));
        assert_eq!(set.count_set(), 0);
    }

    #[test]
    fn test_visit_orders_by_name() {
        let mut set = ConfigSet::new();
        set.string("zeta", String::new(), "");
        set.string("alpha", String::new(), "");
        set.string("mid", String::new(), "");
        set.set("zeta", "z").unwrap();
        set.set("alpha", "a").unwrap();

        let mut all = Vec::new();
        set.visit_all(|b| all.push(b.name.clone()));
        assert_eq!(all, ["alpha", "mid", "zeta"]);

        let mut actual = Vec::new();
        set.visit(|b| actual.push(b.name.clone()));
        assert_eq!(actual, ["alpha", "zeta"]);
        assert_eq!(set.count_set(), 2);
    }

    #[test]
    fn test_entries_snapshot() {
        let mut set = ConfigSet::new();
        set.duration("timeout", Duration::seconds(5), "request timeout");
        set.bool("verbose", false, "");
        set.set("timeout", "1m").unwrap();

        let entries = set.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "timeout");
        assert_eq!(entries[0].value, "1m");
        assert_eq!(entries[0].default, "5s");
        assert!(entries[0].set);
        assert!(!entries[1].set);
    }

    #[test]
    fn test_init_sets_file() {
        let mut set = ConfigSet::new();
        assert!(set.file().is_none());
        set.init("/etc/app.conf");
        assert_eq!(set.file(), Some(Path::new("/etc/app.conf")));
    }
}
