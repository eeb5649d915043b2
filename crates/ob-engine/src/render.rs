//! Textual rendering of argument and variable values for the graph.
//!
//! The activation graph shows `name = value` for every argument and state
//! variable of an active option — but only for types that can be shown.
//! Whether a type is displayable is decided at compile time with an
//! autoref-based capability probe: `(&ArgProbe(&value)).text()` resolves to
//! the inherent method when the type is `Display` and to the fallback trait
//! method (which renders nothing) otherwise. The probe only behaves this way
//! under method-call syntax, which is why it is meant to be used through the
//! `option!` macro rather than directly.

use std::fmt;

/// Wraps a value so the probe can decide between `Display` and nothing.
pub struct ArgProbe<'a, T>(pub &'a T);

impl<'a, T: fmt::Display> ArgProbe<'a, T> {
    /// Displayable value: render it.
    pub fn text(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// Fallback for values that are not `Display`.
pub trait ProbeFallback {
    fn text(&self) -> Option<String>;
}

impl<'a, T> ProbeFallback for &ArgProbe<'a, T> {
    /// Not displayable: render nothing, diagnostics only.
    fn text(&self) -> Option<String> {
        None
    }
}
