//! Per-option state persisted across cycles.
//!
//! One `OptionContext` exists per registered option per behavior instance.
//! Nothing outside the engine mutates it: all writes happen through
//! [`OptionScope`][crate::OptionScope] while the option is in flight, which
//! is what makes the re-entry and signaling rules enforceable in one place.

use std::any::Any;

use ob_core::{Cycle, StateId, StateKind};

/// The persistent state of one option.
///
/// Invariants (after the option's first entry):
///
/// - `state_kind == Initial` exactly when `state_id == StateId::INITIAL`,
/// - `state_start >= option_start`,
/// - `defs` is populated before the option's first real execution (the first
///   `begin_frame` runs all registered initializers).
#[derive(Default)]
pub struct OptionContext {
    /// The state currently selected.
    pub(crate) state_id: StateId,
    /// Name of the current state, for graph emission.
    pub(crate) state_name: &'static str,
    /// Kind of the current state.
    pub(crate) state_kind: StateKind,
    /// Kind the last sub-option invoked from this option ended in; consumed
    /// by `action_done`/`action_aborted` in the following cycle.
    pub(crate) last_sub_kind: StateKind,
    /// Last cycle in which this option ran to completion (probes that stayed
    /// in their initial state do not count).
    pub(crate) last_active_cycle: Option<Cycle>,
    /// Last cycle in which this option was entered at all, probes included.
    pub(crate) last_selected_cycle: Option<Cycle>,
    /// Cycle the current activation started in (`option_time` reference).
    pub(crate) option_start: Cycle,
    /// Cycle the current state was entered in (`state_time` reference).
    pub(crate) state_start: Cycle,
    /// Already appended to the activation graph this cycle?
    pub(crate) added_to_graph: bool,
    /// Per-cycle latch: has a transition block run / a state change happened?
    pub(crate) transition_fired: bool,
    /// Set while the common transition of this option's body is in charge;
    /// cleared when a per-state transition block takes over.
    pub(crate) has_common_transition: bool,
    /// Constant definitions, installed once by the first `begin_frame`.
    pub(crate) defs: Option<Box<dyn Any + Send>>,
    /// State variables, allocated lazily on first use.
    pub(crate) vars: Option<Box<dyn Any + Send>>,
}
