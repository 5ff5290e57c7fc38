//! confset
//!
//! Typed configs that can be filled from the command line and persisted to
//! flat `key = value # comment` files.
//!
//! ```
//! use confset::ConfigSet;
//!
//! let mut set = ConfigSet::new();
//! let verbose = set.bool("verbose", false, "chatty output");
//! let workers = set.uint("workers", 4, "worker threads");
//!
//! set.parse(["-verbose", "-workers", "8", "input.txt"]).unwrap();
//! assert!(verbose.get());
//! assert_eq!(workers.get(), 8);
//! assert_eq!(set.args(), ["input.txt"]);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod file;
pub mod flags;
pub mod global;
pub mod observability;
pub mod registry;
pub mod value;

pub use error::{Error, ParseError, ParseFailure, Result};
pub use registry::{Binding, ConfigSet, Entry};
pub use value::{Handle, Kind, Value};
