//! The behavior's logical clock.
//!
//! # Design
//!
//! Time is whatever the host says it is: `begin_frame` receives an opaque
//! `Cycle` stamp and every duration the engine exposes (`option_time`,
//! `state_time`) is a difference of two stamps. The engine never looks at a
//! wall clock, which keeps behaviors replayable — feeding the same stamps and
//! the same world produces the same activation graphs.
//!
//! Hosts typically pass either a frame counter or a millisecond timestamp.
//! The only requirement is that stamps do not repeat across frames; a host
//! that reuses a stamp collapses `option_time`/`state_time` progression for
//! that frame (tolerated, not detected).

use std::fmt;

/// An absolute cycle stamp, as passed to `begin_frame`.
///
/// `u32` matches the millisecond timestamps robot hosts tend to use; at
/// 1 ms resolution it wraps after ~49 days of uptime, far beyond a match.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cycle(pub u32);

impl Cycle {
    pub const ZERO: Cycle = Cycle(0);

    /// Stamps elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Cycle) -> u32 {
        self.0 - earlier.0
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}
