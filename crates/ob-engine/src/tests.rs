//! Unit tests for ob-engine.
//!
//! The option declarations below double as the macro's acceptance tests:
//! every section of the declaration language appears at least once.

use std::sync::Arc;

use ob_core::{Cycle, StateKind};

use crate::{Behavior, OptionDescriptor, OptionSet};

// ── Test world ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct World {
    output: i32,
    gain: f32,
    log: Vec<&'static str>,
    selected: bool,
    probe_time: u32,
    blob_len: usize,
}

// ── Test options ──────────────────────────────────────────────────────────────

crate::option! {
    /// Sets the output and stays in its initial state.
    pub hello(world: World, o) {
        initial_state s0 {
            action {
                world.output = 1;
            }
        }
    }
}

crate::option! {
    /// Leaves the initial state unconditionally on the first cycle.
    pub two_step(world: World, o) {
        initial_state s0 {
            transition {
                true => s1,
            }
            action {}
        }
        state s1 {
            action {}
        }
    }
}

crate::option! {
    /// Reaches a target state on its first cycle.
    pub reach(world: World, o) {
        initial_state begin {
            transition {
                true => done,
            }
        }
        target_state done {
            action {}
        }
    }
}

crate::option! {
    /// Ends in an aborted state on its first cycle.
    pub give_up(world: World, o) {
        initial_state begin {
            transition {
                true => lost,
            }
        }
        aborted_state lost {
            action {}
        }
    }
}

crate::option! {
    /// Runs `reach` and finishes once the sub-option reports done.
    pub watcher(world: World, o) {
        initial_state watch {
            transition {
                o.action_done() => finished,
            }
            action {
                o.call(world, "reach");
            }
        }
        target_state finished {
            action {}
        }
    }
}

crate::option! {
    /// Runs `give_up` and records when the sub-option aborts.
    pub pessimist(world: World, o) {
        initial_state watch {
            transition {
                o.action_aborted() => resigned,
            }
            action {
                o.call(world, "give_up");
            }
        }
        state resigned {
            action {}
        }
    }
}

crate::option! {
    /// Never leaves its initial state; its action records each probe.
    pub decline(world: World, o) {
        initial_state idle {
            action {
                world.log.push("decline");
                world.probe_time = o.option_time();
            }
        }
    }
}

crate::option! {
    /// Accepts immediately (variant "b").
    pub accept_b(world: World, o) {
        initial_state go {
            transition {
                true => active,
            }
        }
        state active {
            action {
                world.log.push("b");
            }
        }
    }
}

crate::option! {
    /// Accepts immediately (variant "c").
    pub accept_c(world: World, o) {
        initial_state go {
            transition {
                true => active,
            }
        }
        state active {
            action {
                world.log.push("c");
            }
        }
    }
}

crate::option! {
    /// Uses `select_option` from an action block.
    pub selector(world: World, o) {
        initial_state choose {
            action {
                world.selected = o.select_option(world, &["decline", "accept_b", "accept_c"]);
            }
        }
    }
}

crate::option! {
    /// The common transition overrides the per-state transition.
    pub common_wins(world: World, o) {
        common_transition {
            true => s2,
        }
        initial_state s1 {
            transition {
                true => s3,
            }
            action {}
        }
        state s2 {
            action {}
        }
        state s3 {
            action {}
        }
    }
}

crate::option! {
    /// Counts the cycles it has been running via a state variable.
    pub counter(world: World, o) {
        vars(v) {
            n: u32 = 0,
        }
        initial_state tick {
            action {
                v.n += 1;
                world.output = v.n as i32;
            }
        }
    }
}

crate::option! {
    /// Adds its two arguments into the output.
    pub push_sum(world: World, o) {
        args(a) {
            x: i32 = 5,
            y: i32,
        }
        initial_state only {
            action {
                world.output = a.x + a.y;
            }
        }
    }
}

crate::option! {
    /// Calls `push_sum` with explicit arguments.
    pub delegator(world: World, o) {
        initial_state run {
            action {
                push_sum::call(world, o, push_sum::Args { y: 2, ..Default::default() });
            }
        }
    }
}

crate::option! {
    /// Takes a non-displayable argument (never rendered into the graph).
    pub opaque_args(world: World, o) {
        args(a) {
            blob: Vec<i32>,
        }
        initial_state only {
            action {
                world.blob_len = a.blob.len();
            }
        }
    }
}

crate::option! {
    /// An option without states: a plain function with a shared block.
    pub plain(world: World, o) {
        shared {
            world.log.push("plain");
        }
    }
}

crate::option! {
    /// Constants loaded from `tuned.cfg`.
    pub tuned(world: World, o) {
        load(d) {
            a: i32,
            b: f32,
        }
        initial_state only {
            action {
                world.output = d.a;
                world.gain = d.b;
            }
        }
    }
}

crate::option! {
    /// Inline constants, no file involved.
    pub fixed(world: World, o) {
        defs(d) {
            scale: i32 = 4,
        }
        initial_state only {
            action {
                world.output = d.scale;
            }
        }
    }
}

// ── Harness ───────────────────────────────────────────────────────────────────

fn basic_set() -> Arc<OptionSet<World>> {
    OptionSet::builder()
        .option(hello::descriptor())
        .option(two_step::descriptor())
        .option(reach::descriptor())
        .option(give_up::descriptor())
        .option(watcher::descriptor())
        .option(pessimist::descriptor())
        .option(decline::descriptor())
        .option(accept_b::descriptor())
        .option(accept_c::descriptor())
        .option(selector::descriptor())
        .option(common_wins::descriptor())
        .option(counter::descriptor())
        .option(push_sum::descriptor())
        .option(delegator::descriptor())
        .option(opaque_args::descriptor())
        .option(plain::descriptor())
        .option(fixed::descriptor())
        .build()
        .unwrap()
}

fn behavior() -> Behavior<World> {
    Behavior::new(basic_set()).record_activation_graph()
}

/// Run one full frame with a single root.
fn frame(b: &mut Behavior<World>, w: &mut World, t: u32, root: &str) -> bool {
    b.begin_frame(Cycle(t)).unwrap();
    let ran = b.execute(w, root);
    b.end_frame();
    ran
}

fn graph_states(b: &Behavior<World>) -> Vec<(&'static str, &'static str)> {
    b.activation_graph()
        .unwrap()
        .iter()
        .map(|n| (n.option, n.state))
        .collect()
}

// ── Hello state (seed scenario 1) ─────────────────────────────────────────────

#[cfg(test)]
mod hello_tests {
    use super::*;

    #[test]
    fn one_node_with_zero_times() {
        let mut b = behavior();
        let mut w = World::default();
        frame(&mut b, &mut w, 10, "hello");

        assert_eq!(w.output, 1);
        let graph = b.activation_graph().unwrap();
        assert_eq!(graph.len(), 1);
        let node = &graph.nodes[0];
        assert_eq!(node.option, "hello");
        assert_eq!(node.depth, 1);
        assert_eq!(node.state, "s0");
        assert_eq!(node.option_time, 0);
        assert_eq!(node.state_time, 0);
    }

    #[test]
    fn staying_in_initial_counts_as_not_executed() {
        let mut b = behavior();
        let mut w = World::default();
        assert!(!frame(&mut b, &mut w, 1, "hello"));
    }
}

// ── Re-entry after a skipped cycle (seed scenario 2) ──────────────────────────

#[cfg(test)]
mod reentry_tests {
    use super::*;

    #[test]
    fn transitions_run_and_option_restarts_after_gap() {
        let mut b = behavior();
        let mut w = World::default();

        assert!(frame(&mut b, &mut w, 1, "two_step"));
        assert_eq!(graph_states(&b), [("two_step", "s1")]);
        let first = &b.activation_graph().unwrap().nodes[0];
        assert_eq!((first.option_time, first.state_time), (0, 0));

        frame(&mut b, &mut w, 2, "two_step");
        let second = &b.activation_graph().unwrap().nodes[0];
        assert_eq!(second.state, "s1");
        assert_eq!((second.option_time, second.state_time), (1, 1));

        // Cycle 3 passes without executing the option.
        b.begin_frame(Cycle(3)).unwrap();
        b.end_frame();

        // Cycle 4 restarts from the initial state with fresh times.
        frame(&mut b, &mut w, 4, "two_step");
        let fourth = &b.activation_graph().unwrap().nodes[0];
        assert_eq!(fourth.state, "s1");
        assert_eq!((fourth.option_time, fourth.state_time), (0, 0));
    }

    #[test]
    fn state_time_never_exceeds_option_time() {
        let mut b = behavior();
        let mut w = World::default();
        for t in 0..5 {
            frame(&mut b, &mut w, t, "two_step");
            let node = &b.activation_graph().unwrap().nodes[0];
            assert!(node.state_time <= node.option_time);
        }
    }
}

// ── Target/aborted signaling (seed scenario 3) ────────────────────────────────

#[cfg(test)]
mod signaling_tests {
    use super::*;

    #[test]
    fn action_done_arrives_one_cycle_later() {
        let mut b = behavior();
        let mut w = World::default();

        frame(&mut b, &mut w, 1, "watcher");
        assert_eq!(graph_states(&b), [("watcher", "watch"), ("reach", "done")]);

        frame(&mut b, &mut w, 2, "watcher");
        assert_eq!(graph_states(&b)[0], ("watcher", "finished"));
    }

    #[test]
    fn action_aborted_arrives_one_cycle_later() {
        let mut b = behavior();
        let mut w = World::default();

        frame(&mut b, &mut w, 1, "pessimist");
        frame(&mut b, &mut w, 2, "pessimist");
        assert_eq!(graph_states(&b)[0], ("pessimist", "resigned"));
    }

    #[test]
    fn signal_does_not_survive_two_idle_cycles() {
        let mut b = behavior();
        let mut w = World::default();

        frame(&mut b, &mut w, 1, "watcher");
        // Two frames without the watcher; the stored Target signal goes stale.
        for t in 2..4 {
            b.begin_frame(Cycle(t)).unwrap();
            b.end_frame();
        }
        frame(&mut b, &mut w, 4, "watcher");
        assert_eq!(graph_states(&b)[0], ("watcher", "watch"));
    }

    #[test]
    fn sub_option_node_is_one_level_deeper() {
        let mut b = behavior();
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "watcher");
        let graph = b.activation_graph().unwrap();
        assert_eq!(graph.nodes[0].depth, 1);
        assert_eq!(graph.nodes[1].depth, 2);
    }
}

// ── select_option (seed scenario 4) ───────────────────────────────────────────

#[cfg(test)]
mod select_tests {
    use super::*;

    #[test]
    fn first_accepting_option_wins() {
        let mut b = behavior();
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "selector");

        assert!(w.selected);
        // The probe ran decline's initial action, but only b was executed.
        assert_eq!(w.log, ["decline", "b"]);
        let options: Vec<_> = b
            .activation_graph()
            .unwrap()
            .iter()
            .map(|n| n.option)
            .collect();
        assert_eq!(options, ["selector", "accept_b"]);
    }

    #[test]
    fn probe_times_do_not_advance() {
        let mut b = behavior();
        let mut w = World::default();
        for t in 1..4 {
            frame(&mut b, &mut w, t, "selector");
        }
        // decline was probed three times; its clock never started.
        assert_eq!(w.probe_time, 0);
    }

    #[test]
    fn declining_option_reports_not_executed() {
        let mut b = behavior();
        let mut w = World::default();
        b.begin_frame(Cycle(1)).unwrap();
        let ran = b.execute(&mut w, "decline");
        b.end_frame();
        assert!(!ran);
    }

    #[test]
    fn unknown_names_in_the_list_are_skipped() {
        crate::option! {
            pub robust(world: World, o) {
                initial_state choose {
                    action {
                        world.selected = o.select_option(world, &["no_such", "accept_b"]);
                    }
                }
            }
        }
        let set = OptionSet::builder()
            .option(robust::descriptor())
            .option(accept_b::descriptor())
            .build()
            .unwrap();
        let mut b = Behavior::new(set);
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "robust");
        assert!(w.selected);
        assert_eq!(w.log, ["b"]);
    }
}

// ── Common transition (seed scenario 5) ───────────────────────────────────────

#[cfg(test)]
mod common_transition_tests {
    use super::*;

    #[test]
    fn common_transition_beats_state_transition() {
        let mut b = behavior();
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "common_wins");
        assert_eq!(graph_states(&b), [("common_wins", "s2")]);
    }
}

// ── Definitions (seed scenario 6) ─────────────────────────────────────────────

#[cfg(test)]
mod defs_tests {
    use super::*;

    fn loaded_set() -> Arc<OptionSet<World>> {
        OptionSet::builder()
            .option(tuned::descriptor())
            .build()
            .unwrap()
    }

    #[test]
    fn values_load_on_first_begin_frame() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tuned.cfg"), "a: 7\nb: 2.5\n").unwrap();

        let mut b = Behavior::new(loaded_set()).defs_dir(dir.path());
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "tuned");
        assert_eq!(w.output, 7);
        assert_eq!(w.gain, 2.5);
    }

    #[test]
    fn missing_file_fails_first_begin_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = Behavior::new(loaded_set()).defs_dir(dir.path());
        assert!(b.begin_frame(Cycle(1)).is_err());
    }

    #[test]
    fn malformed_file_fails_first_begin_frame() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tuned.cfg"), "a: seven\nb: 2.5\n").unwrap();
        let mut b = Behavior::new(loaded_set()).defs_dir(dir.path());
        assert!(b.begin_frame(Cycle(1)).is_err());
    }

    #[test]
    fn inline_defs_need_no_file() {
        let mut b = behavior();
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "fixed");
        assert_eq!(w.output, 4);
    }
}

// ── State variables ───────────────────────────────────────────────────────────

#[cfg(test)]
mod vars_tests {
    use super::*;

    #[test]
    fn persist_while_active_and_reset_after_gap() {
        let mut b = behavior();
        let mut w = World::default();

        frame(&mut b, &mut w, 1, "counter");
        frame(&mut b, &mut w, 2, "counter");
        assert_eq!(w.output, 2);

        b.begin_frame(Cycle(3)).unwrap();
        b.end_frame();

        frame(&mut b, &mut w, 4, "counter");
        assert_eq!(w.output, 1);
    }

    #[test]
    fn rendered_into_the_graph() {
        let mut b = behavior();
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "counter");
        let node = &b.activation_graph().unwrap().nodes[0];
        // Streamed before the action increments it.
        assert_eq!(node.arguments, ["n = 0"]);
    }
}

// ── Arguments ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod args_tests {
    use super::*;

    #[test]
    fn typed_call_applies_defaults() {
        let mut b = behavior();
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "delegator");
        assert_eq!(w.output, 7); // x default 5 + y 2
    }

    #[test]
    fn only_non_default_arguments_are_rendered() {
        let mut b = behavior();
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "delegator");
        let graph = b.activation_graph().unwrap();
        assert_eq!(graph.nodes[1].option, "push_sum");
        assert_eq!(graph.nodes[1].arguments, ["y = 2"]);
    }

    #[test]
    fn options_with_args_cannot_be_roots() {
        let mut b = behavior();
        let mut w = World::default();
        assert!(!frame(&mut b, &mut w, 1, "push_sum"));
        assert!(b.activation_graph().unwrap().is_empty());
    }

    #[test]
    fn non_displayable_arguments_are_skipped() {
        crate::option! {
            pub opaque_caller(world: World, o) {
                initial_state run {
                    action {
                        opaque_args::call(
                            world,
                            o,
                            opaque_args::Args { blob: vec![1, 2, 3] },
                        );
                    }
                }
            }
        }
        let set = OptionSet::builder()
            .option(opaque_caller::descriptor())
            .option(opaque_args::descriptor())
            .build()
            .unwrap();
        let mut b = Behavior::new(set).record_activation_graph();
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "opaque_caller");
        assert_eq!(w.blob_len, 3);
        assert!(b.activation_graph().unwrap().nodes[1].arguments.is_empty());
    }
}

// ── Stateless options ─────────────────────────────────────────────────────────

#[cfg(test)]
mod stateless_tests {
    use super::*;

    #[test]
    fn runs_as_plain_function_without_graph_node() {
        let mut b = behavior();
        let mut w = World::default();
        assert!(frame(&mut b, &mut w, 1, "plain"));
        assert_eq!(w.log, ["plain"]);
        assert!(b.activation_graph().unwrap().is_empty());
    }
}

// ── Engine boundaries ─────────────────────────────────────────────────────────

#[cfg(test)]
mod engine_tests {
    use super::*;

    #[test]
    fn unknown_root_is_a_silent_noop() {
        let mut b = behavior();
        let mut w = World::default();
        assert!(!frame(&mut b, &mut w, 1, "no_such_option"));
        assert!(b.activation_graph().unwrap().is_empty());
    }

    #[test]
    fn empty_frame_leaves_an_empty_graph() {
        let mut b = behavior();
        b.begin_frame(Cycle(1)).unwrap();
        assert!(b.activation_graph().unwrap().is_empty());
        b.end_frame();
    }

    #[test]
    fn graph_is_absent_unless_recording() {
        let set = basic_set();
        let mut b = Behavior::new(set);
        let mut w = World::default();
        frame(&mut b, &mut w, 1, "hello");
        assert!(b.activation_graph().is_none());
        assert_eq!(w.output, 1);
    }

    #[test]
    fn double_execute_duplicates_the_subtree_identically() {
        let mut b = behavior();
        let mut w = World::default();
        b.begin_frame(Cycle(1)).unwrap();
        b.execute(&mut w, "two_step");
        b.execute(&mut w, "two_step");
        b.end_frame();
        let graph = b.activation_graph().unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes[0], graph.nodes[1]);
    }

    #[test]
    fn roots_append_to_the_same_graph() {
        let mut b = behavior();
        let mut w = World::default();
        b.begin_frame(Cycle(1)).unwrap();
        b.execute(&mut w, "hello");
        b.execute(&mut w, "two_step");
        b.end_frame();
        assert_eq!(
            graph_states(&b),
            [("hello", "s0"), ("two_step", "s1")]
        );
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn none_sentinel_is_always_present_and_declines() {
        let set = OptionSet::builder().build().unwrap();
        assert!(set.contains("none"));
        let mut b = Behavior::<World>::new(set);
        let mut w = World::default();
        assert!(!frame(&mut b, &mut w, 1, "none"));
    }

    #[test]
    fn duplicate_registration_is_idempotent() {
        let set = OptionSet::builder()
            .option(hello::descriptor())
            .option(hello::descriptor())
            .build()
            .unwrap();
        assert_eq!(set.len(), 2); // none + hello
    }

    #[test]
    fn conflicting_registration_is_rejected() {
        fn impostor(_: &mut World, _: &mut crate::OptionScope<'_, World>) {}
        let fake = OptionDescriptor::<World> {
            name: "hello",
            entry: Some(impostor),
            defs_init: None,
            has_states: true,
        };
        let result = OptionSet::builder()
            .option(hello::descriptor())
            .option(fake)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn resolve_finds_registered_options() {
        let set = basic_set();
        assert!(set.resolve("hello").is_some());
        assert!(set.resolve("nope").is_none());
        let id = set.resolve("two_step").unwrap();
        assert_eq!(set.descriptor(id).name, "two_step");
    }
}

// ── State table generated by the macro ────────────────────────────────────────

#[cfg(test)]
mod state_table_tests {
    use super::*;
    use ob_core::StateId;

    crate::option! {
        /// Initial state declared in the middle of the state list.
        pub mixed_order(world: World, o) {
            state early {
                action {}
            }
            initial_state middle {
                transition {
                    true => early,
                }
            }
            target_state late {
                action {}
            }
        }
    }

    #[test]
    fn initial_state_gets_the_sentinel_id_regardless_of_position() {
        let set = OptionSet::builder()
            .option(mixed_order::descriptor())
            .build()
            .unwrap();
        let mut b = Behavior::new(set).record_activation_graph();
        let mut w = World::default();
        b.begin_frame(Cycle(1)).unwrap();
        b.execute(&mut w, "mixed_order");
        assert_eq!(
            b.activation_graph().unwrap().nodes[0].state,
            "early"
        );
        b.end_frame();
    }

    #[test]
    fn fresh_context_reports_initial() {
        let mut b = behavior();
        let mut w = World::default();
        // Before the first transition the option reports its initial state.
        b.begin_frame(Cycle(1)).unwrap();
        b.execute(&mut w, "hello");
        b.end_frame();
        let id = b.options().resolve("hello").unwrap();
        assert_eq!(b.contexts[id.index()].state_id, StateId::INITIAL);
        assert_eq!(b.contexts[id.index()].state_kind, StateKind::Initial);
    }
}
