//! `DefsReader` — parse a definitions file into typed values.
//!
//! The reader is consumed in two phases: `take` pulls declared keys out one
//! by one (the `option!` macro generates one `take` per declared constant),
//! then `finish` verifies that nothing is left over. Splitting it this way
//! lets the macro build the typed struct with plain struct-literal syntax
//! while still detecting unknown keys.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::{ConfigError, ConfigResult};

/// A parsed `name: value` file, ready to be drained into a defs struct.
#[derive(Debug)]
pub struct DefsReader {
    /// File name for error messages, e.g. `"GoToBall.cfg"`.
    file: String,
    entries: HashMap<String, String>,
}

impl DefsReader {
    /// Open and parse `<dir>/<option_name>.cfg`.
    pub fn open(dir: &Path, option_name: &str) -> ConfigResult<Self> {
        let path = dir.join(format!("{option_name}.cfg"));
        let file = std::fs::File::open(&path).map_err(|source| ConfigError::Open {
            path: path.clone(),
            source,
        })?;
        Self::from_reader(format!("{option_name}.cfg"), file)
    }

    /// Like [`open`][Self::open] but accepts any `Read` source.
    ///
    /// Useful for testing (pass a `std::io::Cursor`).
    pub fn from_reader<R: Read>(file: String, mut reader: R) -> ConfigResult<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|source| ConfigError::Read {
                file: file.clone(),
                source,
            })?;
        Self::parse(file, &text)
    }

    fn parse(file: String, text: &str) -> ConfigResult<Self> {
        // Every line must be newline-terminated, including the last one.
        if !text.is_empty() && !text.ends_with('\n') {
            return Err(ConfigError::MissingFinalNewline { file });
        }

        let mut entries = HashMap::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((name, value)) = line.split_once(':') else {
                return Err(ConfigError::Syntax {
                    file,
                    line: i + 1,
                });
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::Syntax {
                    file,
                    line: i + 1,
                });
            }
            if entries
                .insert(name.to_string(), value.trim().to_string())
                .is_some()
            {
                return Err(ConfigError::DuplicateKey {
                    file,
                    key: name.to_string(),
                });
            }
        }
        Ok(DefsReader { file, entries })
    }

    /// Remove and parse the value declared under `key`.
    pub fn take<T: FromStr>(&mut self, key: &str) -> ConfigResult<T>
    where
        T::Err: std::fmt::Display,
    {
        let raw = self
            .entries
            .remove(key)
            .ok_or_else(|| ConfigError::MissingKey {
                file: self.file.clone(),
                key: key.to_string(),
            })?;
        raw.parse().map_err(|e: T::Err| ConfigError::Value {
            file: self.file.clone(),
            key: key.to_string(),
            raw,
            message: e.to_string(),
        })
    }

    /// Fail if any keys were present in the file but never `take`n.
    pub fn finish(self) -> ConfigResult<()> {
        match self.entries.into_iter().next() {
            None => Ok(()),
            Some((key, _)) => Err(ConfigError::UnknownKey {
                file: self.file,
                key,
            }),
        }
    }
}
