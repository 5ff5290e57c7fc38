//! Typed values bound to caller-owned storage.
//!
//! A [`Value`] is one of eight closed variants. Each variant wraps a
//! [`Handle`] to a storage cell and knows how to parse text into that cell
//! and render the cell back to text.

mod duration;
mod numeric;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::error::{ParseError, ParseFailure};

pub use duration::{format_duration, parse_duration};
pub use numeric::{parse_signed, parse_unsigned};

/// Literals accepted for boolean values.
const TRUE_LITERALS: &[&str] = &["1", "t", "T", "true", "TRUE", "True"];
const FALSE_LITERALS: &[&str] = &["0", "f", "F", "false", "FALSE", "False"];

/// Shared storage cell for one config value.
///
/// Cloning a handle aliases the same cell, so the registry and the code that
/// defined a config always observe the same value.
pub struct Handle<T>(Arc<RwLock<T>>);

impl<T> Handle<T> {
    /// Create a handle holding `value`.
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Replace the stored value.
    pub fn set(&self, value: T) {
        *self.0.write() = value;
    }

    /// Run `f` with a reference to the stored value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.read())
    }

    /// Whether both handles point at the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> Handle<T> {
    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.0.read().clone()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Handle<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&*self.0.read()).finish()
    }
}

/// The type of a config, without its storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bool,
    Int,
    Int64,
    Uint,
    Uint64,
    Float64,
    String,
    Duration,
}

impl Kind {
    /// Lowercase type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint64 => "uint64",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value bound to external storage.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(Handle<bool>),
    Int(Handle<isize>),
    Int64(Handle<i64>),
    Uint(Handle<usize>),
    Uint64(Handle<u64>),
    Float64(Handle<f64>),
    Str(Handle<String>),
    Duration(Handle<chrono::Duration>),
}

impl Value {
    /// Which kind of value this is.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Int64(_) => Kind::Int64,
            Self::Uint(_) => Kind::Uint,
            Self::Uint64(_) => Kind::Uint64,
            Self::Float64(_) => Kind::Float64,
            Self::Str(_) => Kind::String,
            Self::Duration(_) => Kind::Duration,
        }
    }

    /// Boolean values never take the next command-line token as their value.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Parse `text` and store the result.
    ///
    /// The storage cell is left untouched when parsing fails.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when `text` is not valid for this kind.
    pub fn parse_and_store(&self, text: &str) -> Result<(), ParseError> {
        let err = |reason: ParseFailure| ParseError::new(self.kind(), text, reason);
        match self {
            Self::Bool(h) => {
                h.set(parse_bool(text).ok_or_else(|| err(ParseFailure::InvalidSyntax))?);
            }
            Self::Int(h) => {
                let v = parse_signed(text).map_err(err)?;
                h.set(isize::try_from(v).map_err(|_| err(ParseFailure::OutOfRange))?);
            }
            Self::Int64(h) => {
                let v = parse_signed(text).map_err(err)?;
                h.set(i64::try_from(v).map_err(|_| err(ParseFailure::OutOfRange))?);
            }
            Self::Uint(h) => {
                let v = parse_unsigned(text).map_err(err)?;
                h.set(usize::try_from(v).map_err(|_| err(ParseFailure::OutOfRange))?);
            }
            Self::Uint64(h) => {
                let v = parse_unsigned(text).map_err(err)?;
                h.set(u64::try_from(v).map_err(|_| err(ParseFailure::OutOfRange))?);
            }
            Self::Float64(h) => {
                h.set(text.parse::<f64>().map_err(|_| err(ParseFailure::InvalidSyntax))?);
            }
            Self::Str(h) => h.set(text.to_string()),
            Self::Duration(h) => h.set(parse_duration(text).map_err(err)?),
        }
        Ok(())
    }

    /// Render the current value as text.
    ///
    /// Every kind except string renders to text that parses back to the
    /// same value.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Bool(h) => h.get().to_string(),
            Self::Int(h) => h.get().to_string(),
            Self::Int64(h) => h.get().to_string(),
            Self::Uint(h) => h.get().to_string(),
            Self::Uint64(h) => h.get().to_string(),
            Self::Float64(h) => format_float(h.get()),
            Self::Str(h) => h.get(),
            Self::Duration(h) => format_duration(h.get()),
        }
    }
}

/// Shortest round-trip digits, switching to exponent form (`1e300`, `5e-7`)
/// when the decimal exponent is below -4 or at least 21.
fn format_float(v: f64) -> String {
    let sci = format!("{v:e}");
    let exp = sci
        .rsplit_once('e')
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .unwrap_or(0);
    if (-4..21).contains(&exp) {
        v.to_string()
    } else {
        sci
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if TRUE_LITERALS.contains(&text) {
        Some(true)
    } else if FALSE_LITERALS.contains(&text) {
        Some(false)
    } else {
        None
    }
}
