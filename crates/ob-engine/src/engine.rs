//! `Behavior<W>` — one behavior instance and its frame loop.
//!
//! # Design
//!
//! The engine is deliberately split from the world it acts on: `W` is the
//! host's own struct of input and output symbols, threaded through every
//! option call as `&mut W`. Keeping the two apart means the borrow checker,
//! not a convention, guarantees that option bodies cannot reach engine
//! internals behind the scope's back, and that at most one behavior instance
//! is in flight per thread at a time.
//!
//! `Behavior` owns everything mutable: the per-option context table, the
//! optional activation-graph sink, the cycle stamps and the published-kind
//! slot that carries `action_done`/`action_aborted` information from each
//! sub-option to its caller. The shared, immutable [`OptionSet`] is held
//! behind an `Arc` so instances are cheap to create.

use std::path::PathBuf;
use std::sync::Arc;

use ob_core::{ActivationGraph, Cycle, OptionId, StateKind};

use crate::context::OptionContext;
use crate::registry::OptionSet;
use crate::scope::OptionScope;
use crate::{EngineError, EngineResult};

/// A behavior instance: the option contexts plus the frame-loop surface.
pub struct Behavior<W> {
    pub(crate) set: Arc<OptionSet<W>>,
    /// One context per catalogue entry, indexed by `OptionId`.
    pub(crate) contexts: Vec<OptionContext>,
    /// Activation-graph sink; `None` disables recording entirely.
    pub(crate) graph: Option<ActivationGraph>,
    /// Directory the definitions files are read from.
    defs_dir: PathBuf,
    pub(crate) current_cycle: Cycle,
    pub(crate) previous_cycle: Option<Cycle>,
    /// Current option nesting depth, for graph emission.
    pub(crate) depth: usize,
    /// The state kind most recently published by a finishing option; each
    /// finishing scope consumes it as "kind of my last sub-option" and
    /// overwrites it with its own kind for its caller.
    pub(crate) published_kind: StateKind,
    defs_initialized: bool,
    in_frame: bool,
}

impl<W> Behavior<W> {
    /// Create an instance over a catalogue. Accepts an `OptionSet` directly
    /// or an `Arc` to one shared with other instances.
    pub fn new(set: impl Into<Arc<OptionSet<W>>>) -> Self {
        let set = set.into();
        let contexts = (0..set.len()).map(|_| OptionContext::default()).collect();
        Behavior {
            set,
            contexts,
            graph: None,
            defs_dir: PathBuf::from("."),
            current_cycle: Cycle::ZERO,
            previous_cycle: None,
            depth: 0,
            published_kind: StateKind::Normal,
            defs_initialized: false,
            in_frame: false,
        }
    }

    /// Record an activation graph every cycle (off by default).
    pub fn record_activation_graph(mut self) -> Self {
        self.graph = Some(ActivationGraph::new());
        self
    }

    /// Read `<OptionName>.cfg` files from `dir` instead of the current
    /// working directory.
    pub fn defs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.defs_dir = dir.into();
        self
    }

    // ── Frame loop ────────────────────────────────────────────────────────

    /// Start a behavior cycle.
    ///
    /// Must be called once per cycle even if no option is executed. The
    /// stamp should differ from the previous frame's stamp; a repeated stamp
    /// is tolerated but freezes `option_time`/`state_time` for the frame.
    ///
    /// The first call runs every registered definitions initializer in
    /// registration order; a missing or malformed `.cfg` file fails here and
    /// will be retried by the next `begin_frame`.
    pub fn begin_frame(&mut self, cycle: Cycle) -> EngineResult<()> {
        debug_assert!(!self.in_frame, "begin_frame without matching end_frame");
        self.current_cycle = cycle;
        if let Some(graph) = self.graph.as_mut() {
            graph.clear();
        }
        if !self.defs_initialized {
            self.init_definitions()?;
            self.defs_initialized = true;
        }
        self.in_frame = true;
        Ok(())
    }

    /// Execute a root option by name.
    ///
    /// May be called any number of times between `begin_frame` and
    /// `end_frame`; each call appends to the activation graph. Returns
    /// whether the option ran (an unknown name is a no-op that returns
    /// `false` and leaves the graph untouched).
    pub fn execute(&mut self, world: &mut W, root: &str) -> bool {
        debug_assert!(self.in_frame, "execute outside begin_frame/end_frame");
        self.invoke(world, root, false)
    }

    /// Finish the cycle: the current stamp becomes the previous one.
    pub fn end_frame(&mut self) {
        debug_assert_eq!(self.depth, 0, "option scopes not unwound at end_frame");
        self.previous_cycle = Some(self.current_cycle);
        self.in_frame = false;
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// The activation graph of the current cycle, if recording is enabled.
    ///
    /// Valid after any `execute` call and before the next `begin_frame`.
    pub fn activation_graph(&self) -> Option<&ActivationGraph> {
        self.graph.as_ref()
    }

    pub fn current_cycle(&self) -> Cycle {
        self.current_cycle
    }

    /// The catalogue this instance runs on.
    pub fn options(&self) -> &OptionSet<W> {
        &self.set
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// By-name invocation, shared by roots, `OptionScope::call` and
    /// `select_option` probes. Returns whether the option ended the cycle
    /// outside its initial state ("actually executed").
    pub(crate) fn invoke(&mut self, world: &mut W, name: &str, from_select: bool) -> bool {
        let Some(id) = self.set.resolve(name) else {
            return false;
        };
        let Some(entry) = self.set.descriptor(id).entry else {
            return false;
        };
        self.run_scoped(world, id, from_select, entry)
    }

    /// The single funnel every option execution goes through: enter the
    /// scope, run the body, run the exit contract. Bodies are plain
    /// functions, so every return path of a body lands back here and the
    /// exit contract cannot be skipped.
    pub(crate) fn run_scoped<F>(
        &mut self,
        world: &mut W,
        id: OptionId,
        from_select: bool,
        body: F,
    ) -> bool
    where
        F: FnOnce(&mut W, &mut OptionScope<'_, W>),
    {
        let mut scope = OptionScope::enter(self, id, from_select);
        body(world, &mut scope);
        scope.finish() != StateKind::Initial
    }

    fn init_definitions(&mut self) -> EngineResult<()> {
        let set = Arc::clone(&self.set);
        for (id, init) in set.initializers() {
            let ctx = &mut self.contexts[id.index()];
            if ctx.defs.is_none() {
                ctx.defs =
                    Some(init(&self.defs_dir).map_err(|source| EngineError::Definitions {
                        option: set.descriptor(id).name,
                        source,
                    })?);
            }
        }
        Ok(())
    }
}
