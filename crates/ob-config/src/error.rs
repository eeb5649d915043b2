//! Error type for definitions-file loading.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading a definitions file.
///
/// Every variant carries the file it happened in; key-level variants carry
/// the key as well, so the failing `Name.cfg` line can be found without a
/// debugger.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open definitions file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read definitions file {file}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}: missing newline at end of file")]
    MissingFinalNewline { file: String },

    #[error("{file}:{line}: expected `name: value`")]
    Syntax { file: String, line: usize },

    #[error("{file}: duplicate definition of {key:?}")]
    DuplicateKey { file: String, key: String },

    #[error("{file}: missing definition of {key:?}")]
    MissingKey { file: String, key: String },

    #[error("{file}: unknown definition {key:?}")]
    UnknownKey { file: String, key: String },

    #[error("{file}: cannot parse {key:?} from {raw:?}: {message}")]
    Value {
        file: String,
        key: String,
        raw: String,
        message: String,
    },
}

/// Shorthand result type for definitions loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
