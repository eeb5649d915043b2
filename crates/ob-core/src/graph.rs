//! The activation graph — the per-cycle record of everything that ran.
//!
//! # Why this exists
//!
//! A behavior that decides differently than expected is near-impossible to
//! debug from its outputs alone. The activation graph answers "what ran this
//! cycle, in which state, for how long, with which arguments" as a flat
//! pre-order list: each option appends its node before any of its
//! sub-options append theirs, so indenting by `depth` reproduces the
//! activation tree.
//!
//! The graph is rebuilt every cycle (cleared by `begin_frame`) and is only
//! valid between an `execute` call and the following `end_frame`.

use std::fmt;

// ── GraphNode ─────────────────────────────────────────────────────────────────

/// One active option in one cycle.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GraphNode {
    /// The option's name.
    pub option: &'static str,
    /// Nesting depth; root options are at depth 1.
    pub depth: usize,
    /// Name of the state the option ended the cycle in.
    pub state: &'static str,
    /// Cycles since the option (re-)started running.
    pub option_time: u32,
    /// Cycles since the current state was entered.
    pub state_time: u32,
    /// Human-readable `name = value` renderings of arguments and variables.
    pub arguments: Vec<String>,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}{} [{}, {}+{}]",
            "",
            self.option,
            self.state,
            self.option_time,
            self.state_time,
            indent = (self.depth.saturating_sub(1)) * 2
        )?;
        if !self.arguments.is_empty() {
            write!(f, " ({})", self.arguments.join(", "))?;
        }
        Ok(())
    }
}

// ── ActivationGraph ───────────────────────────────────────────────────────────

/// Ordered sequence of [`GraphNode`]s in depth-first pre-order of invocation.
#[derive(Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActivationGraph {
    pub nodes: Vec<GraphNode>,
}

impl ActivationGraph {
    pub fn new() -> Self {
        ActivationGraph {
            // A behavior tree deeper than this is a design smell anyway.
            nodes: Vec::with_capacity(64),
        }
    }

    /// Drop all nodes but keep the allocation for the next cycle.
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    #[inline]
    pub fn push(&mut self, node: GraphNode) {
        self.nodes.push(node);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GraphNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'a> IntoIterator for &'a ActivationGraph {
    type Item = &'a GraphNode;
    type IntoIter = std::slice::Iter<'a, GraphNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl fmt::Display for ActivationGraph {
    /// One node per line, indented by depth.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{node}")?;
        }
        Ok(())
    }
}
