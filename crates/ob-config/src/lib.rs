//! `ob-config` — the `<OptionName>.cfg` definitions-file reader.
//!
//! Options can declare constant definitions whose values are loaded from a
//! text file once per behavior instance (the `load(..)` section of the
//! `option!` macro). This crate owns the file format and its error
//! reporting; the engine only sees a typed struct coming back.
//!
//! # File format
//!
//! One `name: value` pair per line, every line terminated by a newline
//! (including the last one):
//!
//! ```text
//! kick_range: 1.5
//! patience: 12
//! ```
//!
//! Values are parsed with the target type's `FromStr`. Names must match the
//! declared constants exactly — a missing name, an unknown name, and a
//! duplicated name are all hard errors, because a definitions file that is
//! out of sync with the option declaring it is a deployment mistake worth
//! failing loudly on.

pub mod error;
pub mod reader;


pub use error::{ConfigError, ConfigResult};
pub use reader::DefsReader;
