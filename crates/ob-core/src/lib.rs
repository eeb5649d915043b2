//! `ob-core` — foundational types for the `rust_ob` behavior framework.
//!
//! This crate is a dependency of every other `ob-*` crate. It intentionally
//! has no `ob-*` dependencies and no required external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                              |
//! |-----------|-------------------------------------------------------|
//! | [`cycle`] | `Cycle` — the logical clock of the behavior loop      |
//! | [`ids`]   | `OptionId`, `StateId`                                 |
//! | [`state`] | `StateKind`, `State`                                  |
//! | [`graph`] | `ActivationGraph`, `GraphNode`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the vocabulary types and  |
//!           | `Serialize` to graph nodes (for host-side graph export).    |

pub mod cycle;
pub mod graph;
pub mod ids;
pub mod state;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cycle::Cycle;
pub use graph::{ActivationGraph, GraphNode};
pub use ids::{OptionId, StateId};
pub use state::{State, StateKind};
