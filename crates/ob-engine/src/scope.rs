//! `OptionScope` — one in-flight execution of one option during one cycle.
//!
//! A scope is created every time an option body is entered and finished when
//! it exits. The entry contract decides whether the option is freshly
//! (re-)starting or continuing from the previous cycle; the exit contract
//! stamps the context, emits the activation-graph node if nothing else did,
//! and moves the option's final state kind through the engine's
//! published-kind slot so the caller can observe `action_done` /
//! `action_aborted` next cycle.
//!
//! Bodies never construct or finish scopes themselves — `Behavior` does, in
//! `run_scoped` — so the exit contract runs on every exit path of a body,
//! early `return`s included.

use ob_core::{GraphNode, OptionId, State, StateId, StateKind};

use crate::context::OptionContext;
use crate::engine::Behavior;

/// Handle every option body receives; all engine access goes through it.
pub struct OptionScope<'a, W> {
    behavior: &'a mut Behavior<W>,
    option: OptionId,
    name: &'static str,
    has_states: bool,
    from_select: bool,
    /// `name = value` renderings accumulated for this cycle's graph node.
    rendered: Vec<String>,
}

impl<'a, W> OptionScope<'a, W> {
    // ── Entry / exit contracts ────────────────────────────────────────────

    /// Entry contract. If the option was not active in the previous or the
    /// current cycle, it restarts in its initial state; if it was not even
    /// probed, the stale sub-option signal is cleared so `action_done`
    /// cannot leak across inactivity.
    pub(crate) fn enter(
        behavior: &'a mut Behavior<W>,
        option: OptionId,
        from_select: bool,
    ) -> Self {
        let (name, has_states) = {
            let descriptor = behavior.set.descriptor(option);
            (descriptor.name, descriptor.has_states)
        };
        let now = behavior.current_cycle;
        let prev = behavior.previous_cycle;

        let ctx = &mut behavior.contexts[option.index()];
        let active_recently = ctx
            .last_active_cycle
            .is_some_and(|c| c == now || Some(c) == prev);
        if has_states && !active_recently {
            ctx.option_start = now;
            ctx.state_start = now;
            ctx.state_id = StateId::INITIAL;
            ctx.state_kind = StateKind::Initial;
        }
        let selected_recently = ctx
            .last_selected_cycle
            .is_some_and(|c| c == now || Some(c) == prev);
        if !selected_recently {
            ctx.last_sub_kind = StateKind::Normal;
        }
        ctx.added_to_graph = false;
        ctx.transition_fired = false;
        ctx.has_common_transition = false;

        behavior.depth += 1;

        OptionScope {
            behavior,
            option,
            name,
            has_states,
            from_select,
            rendered: Vec::new(),
        }
    }

    /// Exit contract; returns the state kind the option ended in.
    ///
    /// A `select_option` probe that stayed in its initial state counts as
    /// "declined": it is not stamped active and leaves no graph node.
    pub(crate) fn finish(mut self) -> StateKind {
        let now = self.behavior.current_cycle;
        let kind = self.ctx().state_kind;

        if !(self.from_select && kind == StateKind::Initial) {
            self.emit_graph_node();
            self.ctx_mut().last_active_cycle = Some(now);
        }
        self.ctx_mut().last_selected_cycle = Some(now);
        self.behavior.depth -= 1;

        // Hand-over chain: consume the kind published by our last sub-option,
        // publish our own for the caller.
        self.ctx_mut().last_sub_kind = self.behavior.published_kind;
        self.behavior.published_kind = kind;

        kind
    }

    // ── Symbols available in option bodies ────────────────────────────────

    /// Cycles since this option (re-)started running.
    pub fn option_time(&self) -> u32 {
        self.behavior.current_cycle.since(self.ctx().option_start)
    }

    /// Cycles since the current state was entered. Never exceeds
    /// [`option_time`][Self::option_time].
    pub fn state_time(&self) -> u32 {
        self.behavior.current_cycle.since(self.ctx().state_start)
    }

    /// Did the last sub-option called in the previous cycle reach a target
    /// state?
    pub fn action_done(&self) -> bool {
        self.ctx().last_sub_kind == StateKind::Target
    }

    /// Did the last sub-option called in the previous cycle reach an aborted
    /// state?
    pub fn action_aborted(&self) -> bool {
        self.ctx().last_sub_kind == StateKind::Aborted
    }

    /// Id of the currently selected state.
    pub fn state_id(&self) -> StateId {
        self.ctx().state_id
    }

    /// Kind of the currently selected state.
    pub fn state_kind(&self) -> StateKind {
        self.ctx().state_kind
    }

    /// Name of the option this scope executes.
    pub fn option_name(&self) -> &'static str {
        self.name
    }

    // ── Sub-option dispatch ───────────────────────────────────────────────

    /// Invoke an argument-less sub-option by name. Unknown names (and
    /// options that require arguments) are a no-op returning `false`.
    pub fn call(&mut self, world: &mut W, name: &str) -> bool {
        self.behavior.invoke(world, name, false)
    }

    /// Probe the listed options in order until one leaves its initial state;
    /// that option counts as executed and ends the search. An option that
    /// stays in its initial state is deemed to have declined and leaves no
    /// trace in the activation graph.
    pub fn select_option(&mut self, world: &mut W, names: &[&str]) -> bool {
        for name in names {
            if self.behavior.invoke(world, name, true) {
                return true;
            }
        }
        false
    }

    /// Typed sub-option invocation; called by the `call` wrappers the
    /// `option!` macro generates for options with arguments.
    pub fn call_sub<A>(
        &mut self,
        world: &mut W,
        name: &'static str,
        args: &A,
        body: fn(&mut W, &A, &mut OptionScope<'_, W>),
    ) -> bool {
        let Some(id) = self.behavior.set.resolve(name) else {
            debug_assert!(false, "option {name:?} was never registered");
            return false;
        };
        self.behavior.run_scoped(
            world,
            id,
            false,
            |world: &mut W, scope: &mut OptionScope<'_, W>| body(world, args, scope),
        )
    }

    // ── Option body protocol (used by `option!` expansions) ───────────────

    /// Marks the start of the body's common transition block.
    pub fn begin_common(&mut self) {
        self.ctx_mut().has_common_transition = true;
    }

    /// Marks the start of the current state's transition block; returns
    /// whether its decision arms should be evaluated. The latch flips so
    /// that the block is skipped when a transition already fired this cycle
    /// (the per-state transition is the `else` branch of the common one),
    /// and so that a state change without any transition block trips the
    /// assertion in [`update_state`][Self::update_state].
    pub fn begin_transition(&mut self) -> bool {
        let ctx = self.ctx_mut();
        ctx.has_common_transition = false;
        ctx.transition_fired = !ctx.transition_fired;
        ctx.transition_fired
    }

    /// Record that the state whose block is about to run is `state` (keeps
    /// the context's state name valid for graph emission).
    pub fn touch_state(&mut self, state: State) {
        self.ctx_mut().state_name = state.name;
    }

    /// Perform a transition to `target`. Transitions to the current state
    /// are ignored (no `state_time` reset).
    pub fn update_state(&mut self, target: State) {
        let now = self.behavior.current_cycle;
        let ctx = self.ctx_mut();
        debug_assert!(
            ctx.has_common_transition != ctx.transition_fired,
            "state change outside a [common_]transition block"
        );
        ctx.transition_fired = true;
        if ctx.state_id != target.id {
            ctx.state_id = target.id;
            ctx.state_name = target.name;
            ctx.state_kind = target.kind;
            ctx.state_start = now;
        }
    }

    /// Marks the start of the current state's action block. Emits this
    /// option's graph node first, so sub-options called from the action
    /// appear after it (pre-order).
    pub fn enter_action(&mut self) {
        if !(self.from_select && self.ctx().state_kind == StateKind::Initial) {
            self.emit_graph_node();
        }
    }

    /// Append a `name = value` rendering to this cycle's graph node.
    /// `None` values (non-displayable types) are silently skipped.
    pub fn add_argument(&mut self, name: &str, rendered: Option<String>) {
        if let Some(text) = rendered {
            self.rendered.push(format!("{name} = {text}"));
        }
    }

    /// Current constant definitions of this option.
    ///
    /// # Panics
    /// Panics if the definitions were never installed, i.e. the option runs
    /// without a prior `begin_frame` — a host programming error.
    pub fn defs<T: Clone + 'static>(&self) -> T {
        self.ctx()
            .defs
            .as_ref()
            .and_then(|defs| defs.downcast_ref::<T>())
            .cloned()
            .expect("option definitions not initialized (begin_frame not called?)")
    }

    /// Detach the option's state variables for the duration of the body.
    pub fn take_vars(&mut self) -> Option<Box<dyn std::any::Any + Send>> {
        self.ctx_mut().vars.take()
    }

    /// Re-attach the state variables detached by
    /// [`take_vars`][Self::take_vars].
    pub fn put_vars(&mut self, vars: Box<dyn std::any::Any + Send>) {
        self.ctx_mut().vars = Some(vars);
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn ctx(&self) -> &OptionContext {
        &self.behavior.contexts[self.option.index()]
    }

    fn ctx_mut(&mut self) -> &mut OptionContext {
        &mut self.behavior.contexts[self.option.index()]
    }

    /// Append this option's node to the activation graph, once per cycle at
    /// most. No-ops when recording is disabled or the option is stateless.
    fn emit_graph_node(&mut self) {
        if !self.has_states {
            return;
        }
        let behavior = &mut *self.behavior;
        let ctx = &mut behavior.contexts[self.option.index()];
        if ctx.added_to_graph {
            return;
        }
        if let Some(graph) = behavior.graph.as_mut() {
            graph.push(GraphNode {
                option: self.name,
                depth: behavior.depth,
                state: ctx.state_name,
                option_time: behavior.current_cycle.since(ctx.option_start),
                state_time: behavior.current_cycle.since(ctx.state_start),
                arguments: self.rendered.clone(),
            });
            ctx.added_to_graph = true;
        }
    }
}
