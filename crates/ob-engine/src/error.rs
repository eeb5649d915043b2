//! Engine error type.
//!
//! The engine does not use errors for control flow: an unknown option name is
//! a `false` return, not an `Err`, so `select_option` callers can use the
//! boolean to mean "none selected". Only two things are real errors — a
//! broken catalogue and a broken definitions file — and both are detected
//! before any option body runs.

use ob_config::ConfigError;
use thiserror::Error;

/// Errors surfaced by catalogue construction and `begin_frame`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("option {name:?} is already registered with a different definition")]
    ConflictingOption { name: &'static str },

    #[error("loading definitions for option {option:?} failed")]
    Definitions {
        option: &'static str,
        #[source]
        source: ConfigError,
    },
}

/// Shorthand result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
