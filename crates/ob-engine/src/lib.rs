//! `ob-engine` — the hierarchical option execution engine.
//!
//! A behavior is a set of *options*: small finite state machines that call
//! each other to form a dynamic activation tree, re-evaluated from the roots
//! once per control cycle. This crate owns everything that happens between
//! `begin_frame` and `end_frame`:
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`engine`]   | `Behavior<W>` — the per-instance engine and frame loop    |
//! | [`scope`]    | `OptionScope` — one in-flight execution of one option     |
//! | [`registry`] | `OptionDescriptor`, `OptionSet` — the option catalogue    |
//! | [`context`]  | per-option state persisted across cycles                  |
//! | [`dsl`]      | the `option!` declaration macro                           |
//! | [`render`]   | textual argument rendering for the activation graph       |
//! | [`error`]    | `EngineError`, `EngineResult`                             |
//!
//! # The cycle contract
//!
//! ```text
//! behavior.begin_frame(Cycle(t))?;   // clears the graph, loads defs once
//! behavior.execute(&mut world, "root");  // any number of roots
//! behavior.end_frame();              // publishes t as the previous cycle
//! ```
//!
//! Everything is single-threaded and synchronous: one behavior instance is
//! driven by one thread, options run to completion within the cycle, and the
//! only I/O is the one-time definitions load in the first `begin_frame`.
//! Separate behavior instances may share one [`OptionSet`] (it is read-only
//! after construction); their per-option state lives in the instances.
//!
//! # Declaring options
//!
//! See the [`option!`](crate::option) macro for the declaration language and
//! [`OptionScope`] for the symbols available inside option bodies
//! (`option_time`, `state_time`, `action_done`, `action_aborted`,
//! `select_option`, ...).

pub mod context;
pub mod dsl;
pub mod engine;
pub mod error;
pub mod registry;
pub mod render;
pub mod scope;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::Behavior;
pub use error::{EngineError, EngineResult};
pub use registry::{DefsInit, OptionBody, OptionDescriptor, OptionSet, OptionSetBuilder};
pub use scope::OptionScope;

// Re-exported so `option!` expansions (and hosts) reach everything through
// one crate.
pub use ob_config::{ConfigError, ConfigResult, DefsReader};
pub use ob_core::{ActivationGraph, Cycle, GraphNode, OptionId, State, StateId, StateKind};
