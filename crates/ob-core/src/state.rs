//! State kinds and the per-state declaration record.

use std::fmt;

use crate::StateId;

// ── StateKind ─────────────────────────────────────────────────────────────────

/// The four kinds of states an option can be in.
///
/// `Target` and `Aborted` are the two terminal signals a parent option can
/// observe through `action_done`/`action_aborted` in the cycle after a
/// sub-option reached such a state.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateKind {
    /// An ordinary state (also the kind reported by stateless options).
    #[default]
    Normal,
    /// The single entry state every option (re-)starts in.
    Initial,
    /// A success state; sets `action_done` in the parent.
    Target,
    /// A failure state; sets `action_aborted` in the parent.
    Aborted,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateKind::Normal => "normal",
            StateKind::Initial => "initial",
            StateKind::Target => "target",
            StateKind::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

/// A state as declared inside an option body.
///
/// Instances are generated by the `option!` macro as one `const` per declared
/// state; transition arms name these constants as their targets.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct State {
    pub id: StateId,
    pub name: &'static str,
    pub kind: StateKind,
}

impl State {
    pub const fn new(id: StateId, name: &'static str, kind: StateKind) -> Self {
        State { id, name, kind }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
