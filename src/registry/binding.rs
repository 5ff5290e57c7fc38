//! One registered config and its serializable snapshot.

use serde::Serialize;

use crate::value::{Kind, Value};

/// A named, typed config bound to storage.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Name as it appears on the command line and in files.
    pub name: String,

    /// Help text.
    pub usage: String,

    /// Typed value writing into the caller's storage.
    pub value: Value,

    /// Rendering of the value at registration time.
    pub default_text: String,
}

impl Binding {
    /// Capture the current rendering of `value` as the default text.
    pub fn new(value: Value, name: impl Into<String>, usage: impl Into<String>) -> Self {
        let default_text = value.render();
        Self {
            name: name.into(),
            usage: usage.into(),
            value,
            default_text,
        }
    }

    /// Kind of the bound value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.value.kind()
    }

    /// Current value as text.
    #[must_use]
    pub fn current(&self) -> String {
        self.value.render()
    }

    /// Snapshot this binding.
    #[must_use]
    pub fn entry(&self, set: bool) -> Entry {
        Entry {
            name: self.name.clone(),
            kind: self.kind(),
            value: self.current(),
            default: self.default_text.clone(),
            usage: self.usage.clone(),
            set,
        }
    }
}

/// Point-in-time view of a binding, used for listings and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    pub kind: Kind,
    pub value: String,
    pub default: String,
    pub usage: String,
    /// Whether the config was explicitly set during this run.
    pub set: bool,
}
