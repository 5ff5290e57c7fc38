//! Error types and Result aliases for confset.
//!
//! This module defines the error hierarchy used throughout the crate.
//! Fallible public functions return `Result<T, Error>` or `Result<T>`.

use std::path::PathBuf;

use thiserror::Error;

use crate::value::Kind;

/// Result type alias using confset's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for confset operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Text could not be parsed into the config's type.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A config name was registered twice.
    #[error("{}config redefined: {name}", file_prefix(.file.as_ref()))]
    Redefined {
        name: String,
        file: Option<PathBuf>,
    },

    /// `set` was called for an unknown name on a strict set.
    #[error("no such config: {0}")]
    UnknownConfig(String),

    /// A non-boolean flag was the last token on the command line.
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),

    /// A flag token that cannot name a config (`---x`, `-=x`).
    #[error("bad flag syntax: {0}")]
    BadFlagSyntax(String),

    /// Load or save on a set that has no file attached.
    #[error("no config file configured")]
    NoFile,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn file_prefix(file: Option<&PathBuf>) -> String {
    file.map(|p| format!("{} ", p.display())).unwrap_or_default()
}

/// Why a piece of text was rejected by a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The text does not follow the type's grammar.
    #[error("invalid syntax")]
    InvalidSyntax,

    /// The number does not fit the type's width.
    #[error("value out of range")]
    OutOfRange,

    /// A sign was given for an unsigned type.
    #[error("negative value for unsigned type")]
    NegativeUnsigned,

    /// A duration component used an unknown unit.
    #[error("unknown unit {0:?}")]
    UnknownUnit(String),

    /// A duration component had no unit.
    #[error("missing unit")]
    MissingUnit,
}

/// Malformed text for a given value kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} value {input:?}: {reason}")]
pub struct ParseError {
    pub kind: Kind,
    pub input: String,
    pub reason: ParseFailure,
}

impl ParseError {
    /// Create a parse error for `input`.
    pub fn new(kind: Kind, input: impl Into<String>, reason: ParseFailure) -> Self {
        Self {
            kind,
            input: input.into(),
            reason,
        }
    }
}

impl Error {
    /// Create a redefinition error.
    pub fn redefined(name: impl Into<String>, file: Option<PathBuf>) -> Self {
        Self::Redefined {
            name: name.into(),
            file,
        }
    }

    /// Whether this error came from parsing text into a typed value.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}
