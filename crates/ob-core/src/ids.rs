//! Strongly typed, zero-cost identifier wrappers.
//!
//! Both IDs are `Copy + Ord + Hash` so they can be used as map keys without
//! ceremony. The inner integer is `pub` for direct indexing into the
//! engine's context table, but callers should prefer `.index()` for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Index of an option in the catalogue it was registered with.
    ///
    /// Assigned by registration order; also the index of the option's context
    /// within a behavior instance.
    pub struct OptionId(u32);
}

typed_id! {
    /// Identifier of a state within one option.
    ///
    /// The initial state is always `StateId::INITIAL`; every other state gets
    /// a unique positive id assigned at declaration time (derived from its
    /// position in the declaration, so it is stable across runs).
    pub struct StateId(u32);
}

impl StateId {
    /// The sentinel id of an option's initial state.
    pub const INITIAL: StateId = StateId(0);
}

impl Default for StateId {
    /// A fresh context starts in the initial state.
    #[inline(always)]
    fn default() -> Self {
        StateId::INITIAL
    }
}
