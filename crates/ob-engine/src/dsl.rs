//! The `option!` declaration macro — the behavior mini-language.
//!
//! An option is declared as one module. The macro generates the module's
//! `Args`/`Defs`/`Vars` records, a `const` per state, the body function that
//! performs the per-cycle state dispatch, and a `descriptor()` used to
//! register the option in an [`OptionSet`][crate::OptionSet].
//!
//! # Shape
//!
//! ```text
//! option! {
//!     /// Doc comment for the option.
//!     pub name(world: WorldType, o) {
//!         args(a)  { field: Type = default, ... }   // optional
//!         defs(d)  { field: Type = value, ... }     // optional: inline constants
//!         load(d)  { field: Type, ... }             // optional: from <name>.cfg
//!         vars(v)  { field: Type = default, ... }   // optional
//!         shared { ...statements... }               // optional prelude
//!         common_transition { cond => target, ... } // optional
//!
//!         initial_state idle {
//!             transition { cond => target, ... }    // optional, first match wins
//!             action { ...statements... }           // optional
//!         }
//!         state / target_state / aborted_state ...
//!     }
//! }
//! ```
//!
//! Sections must appear in the order shown. `world` and `o` are the names
//! under which the body's code sees the host world (`&mut WorldType`) and
//! the [`OptionScope`][crate::OptionScope]; `a`/`d`/`v` name the records in
//! the same way. Transition arms replace the classic `goto` decision tree:
//! arms are evaluated top to bottom and the first true condition switches to
//! its target state, after which the target state's `action` runs in the
//! same cycle.
//!
//! # Dispatch rules the expansion guarantees
//!
//! - Exactly one state's blocks run per cycle: the transition block of the
//!   state selected at entry, then the action block of the state selected
//!   after transitions.
//! - A state change marks the per-cycle transition latch; when the common
//!   transition fired, per-state transitions are skipped (they are its
//!   `else` branch).
//! - The action block appends the option's activation-graph node before any
//!   statement runs, so sub-option calls produce a pre-order graph.
//! - Exactly one `initial_state` must be declared (compile-time check);
//!   its id is [`StateId::INITIAL`][crate::StateId::INITIAL], every other
//!   state gets a stable positive id from its declaration position.
//! - Declaring no state at all is allowed: the option behaves as a plain
//!   function and never appears in the activation graph.
//!
//! `vars` keep their values from cycle to cycle while the option stays
//! active and are re-initialized when it restarts. `defs` and `load`
//! constants are installed once per behavior instance during the first
//! `begin_frame`; `load` reads `<name>.cfg` from the behavior's definitions
//! directory, one newline-terminated `name: value` line per constant.

/// Declare an option. See the [module docs][self] for the full grammar.
///
/// # Example
///
/// ```
/// use ob_engine::{Behavior, Cycle, OptionSet};
///
/// #[derive(Default)]
/// struct Counter {
///     total: u32,
/// }
///
/// ob_engine::option! {
///     /// Flashes every third cycle.
///     pub blink(world: Counter, o) {
///         initial_state off {
///             transition {
///                 o.state_time() >= 2 => on,
///             }
///         }
///         state on {
///             transition {
///                 true => off,
///             }
///             action {
///                 world.total += 1;
///             }
///         }
///     }
/// }
///
/// fn main() {
///     let set = OptionSet::builder().option(blink::descriptor()).build().unwrap();
///     let mut behavior = Behavior::new(set);
///     let mut world = Counter::default();
///     for t in 0..6 {
///         behavior.begin_frame(Cycle(t)).unwrap();
///         behavior.execute(&mut world, "blink");
///         behavior.end_frame();
///     }
///     assert_eq!(world.total, 2); // cycles 2 and 5
/// }
/// ```
#[macro_export]
macro_rules! option {
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident ( $world:ident : $World:ty, $o:ident ) {
            $($rest:tt)*
        }
    ) => {
        $crate::__ob_opt_args! {
            [$(#[$meta])*] [$vis] [$name] [$world] [$World] [$o]
            $($rest)*
        }
    };
}

// Disambiguation note: the grammar below used to be a single macro_rules
// arm with a chain of `$( section { .. } )?` groups followed by a
// `$( $skind $sname { .. } )*` repetition of states. rustc rejects that as
// a "local ambiguity" (it won't speculatively try the optional-group vs.
// repetition parse for an `ident ident { .. }` shape). Splitting each
// optional section into its own macro with a literal-keyword arm and a
// catch-all arm sidesteps the ambiguity: arm selection across separate
// `macro_rules!` rules is a plain first-match, not the same-rule
// alternative analysis that triggers the error.
#[doc(hidden)]
#[macro_export]
macro_rules! __ob_opt_args {
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        args ( $a:ident ) {
            $( $af:ident : $aty:ty $( = $adefault:expr )? ),* $(,)?
        }
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_defs! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [ $a { $( $af : $aty $( = $adefault )? ),* } ]
            $($rest)*
        }
    };
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_defs! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            []
            $($rest)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_opt_defs {
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*]
        defs ( $dd:ident ) {
            $( $df:ident : $dty:ty = $ddefault:expr ),* $(,)?
        }
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_load! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*]
            [ $dd { $( $df : $dty = $ddefault ),* } ]
            $($rest)*
        }
    };
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*]
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_load! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*]
            []
            $($rest)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_opt_load {
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*] [$($defsb:tt)*]
        load ( $ld:ident ) {
            $( $lf:ident : $lty:ty ),* $(,)?
        }
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_vars! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*] [$($defsb)*]
            [ $ld { $( $lf : $lty ),* } ]
            $($rest)*
        }
    };
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*] [$($defsb:tt)*]
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_vars! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*] [$($defsb)*]
            []
            $($rest)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_opt_vars {
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*] [$($defsb:tt)*] [$($loadb:tt)*]
        vars ( $v:ident ) {
            $( $vf:ident : $vty:ty $( = $vdefault:expr )? ),* $(,)?
        }
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_shared! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*] [$($defsb)*] [$($loadb)*]
            [ $v { $( $vf : $vty $( = $vdefault )? ),* } ]
            $($rest)*
        }
    };
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*] [$($defsb:tt)*] [$($loadb:tt)*]
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_shared! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*] [$($defsb)*] [$($loadb)*]
            []
            $($rest)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_opt_shared {
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*] [$($defsb:tt)*] [$($loadb:tt)*] [$($varsb:tt)*]
        shared { $( $shared:tt )* }
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_ct! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*] [$($defsb)*] [$($loadb)*] [$($varsb)*]
            [ { $( $shared )* } ]
            $($rest)*
        }
    };
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*] [$($defsb:tt)*] [$($loadb:tt)*] [$($varsb:tt)*]
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_ct! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*] [$($defsb)*] [$($loadb)*] [$($varsb)*]
            []
            $($rest)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_opt_ct {
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*] [$($defsb:tt)*] [$($loadb:tt)*] [$($varsb:tt)*] [$($sharedb:tt)*]
        common_transition {
            $( $ccond:expr => $ctarget:ident ),* $(,)?
        }
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_finish! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*] [$($defsb)*] [$($loadb)*] [$($varsb)*] [$($sharedb)*]
            [ { $( $ccond => $ctarget ),* } ]
            $($rest)*
        }
    };
    (
        [$($meta:tt)*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [$($argsb:tt)*] [$($defsb:tt)*] [$($loadb:tt)*] [$($varsb:tt)*] [$($sharedb:tt)*]
        $($rest:tt)*
    ) => {
        $crate::__ob_opt_finish! {
            [$($meta)*] [$vis] [$name] [$world] [$World] [$o]
            [$($argsb)*] [$($defsb)*] [$($loadb)*] [$($varsb)*] [$($sharedb)*]
            []
            $($rest)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_opt_finish {
    (
        [$(#[$meta:meta])*] [$vis:vis] [$name:ident] [$world:ident] [$World:ty] [$o:ident]
        [ $( $a:ident { $( $af:ident : $aty:ty $( = $adefault:expr )? ),* } )? ]
        [ $( $dd:ident { $( $df:ident : $dty:ty = $ddefault:expr ),* } )? ]
        [ $( $ld:ident { $( $lf:ident : $lty:ty ),* } )? ]
        [ $( $v:ident { $( $vf:ident : $vty:ty $( = $vdefault:expr )? ),* } )? ]
        [ $( { $( $shared:tt )* } )? ]
        [ $( { $( $ccond:expr => $ctarget:ident ),* } )? ]
        $(
            $skind:ident $sname:ident {
                $( transition {
                    $( $tcond:expr => $ttarget:ident ),* $(,)?
                } )?
                $( action $abody:block )?
            }
        )*
    ) => {
        $(#[$meta])*
        $vis mod $name {
            #![allow(unused_imports, dead_code)]

            use super::*;
            use $crate::render::ProbeFallback as _;

            /// Name this option is registered under.
            pub const NAME: &str = stringify!($name);

            const __STATE_COUNT: usize = 0 $( + $crate::__ob_one!($sname) )*;
            const __INITIAL_COUNT: usize = 0 $( + $crate::__ob_initial_one!($skind) )*;
            const _: () = assert!(
                __STATE_COUNT == 0 || __INITIAL_COUNT == 1,
                "an option must declare exactly one initial_state"
            );

            // Declaration order of the states; the source of their ids.
            #[allow(non_camel_case_types)]
            enum __Ord { $( $sname, )* }

            $(
                #[allow(non_upper_case_globals)]
                const $sname: $crate::State = $crate::State::new(
                    $crate::__ob_state_id!($skind, __Ord::$sname),
                    stringify!($sname),
                    $crate::__ob_state_kind!($skind),
                );
            )*

            /// Arguments of this option; unspecified fields take their
            /// declared defaults.
            #[derive(Clone)]
            pub struct Args {
                $( $( pub $af: $aty, )* )?
            }

            impl Default for Args {
                fn default() -> Self {
                    Args {
                        $( $( $af: $crate::__ob_default!($( $adefault )?), )* )?
                    }
                }
            }

            /// Constant definitions of this option.
            #[derive(Clone)]
            pub struct Defs {
                $( $( pub $df: $dty, )* )?
                $( $( pub $lf: $lty, )* )?
            }

            /// State variables of this option.
            pub struct Vars {
                $( $( pub $vf: $vty, )* )?
            }

            impl Vars {
                fn initial() -> Self {
                    Vars {
                        $( $( $vf: $crate::__ob_default!($( $vdefault )?), )* )?
                    }
                }
            }

            /// Registration record; hand this to an `OptionSetBuilder`.
            pub fn descriptor() -> $crate::OptionDescriptor<$World> {
                const __HAS_ARGS: bool = false $( || $crate::__ob_true!($a) )?;
                const __HAS_DEFS: bool =
                    false $( || $crate::__ob_true!($dd) )? $( || $crate::__ob_true!($ld) )?;
                $crate::OptionDescriptor {
                    name: NAME,
                    entry: if __HAS_ARGS { None } else { Some(__entry) },
                    defs_init: if __HAS_DEFS { Some(__init_defs) } else { None },
                    has_states: __STATE_COUNT > 0,
                }
            }

            $(
                /// Execute this option as a sub-option with explicit
                /// arguments; returns whether it left its initial state.
                pub fn call(
                    $world: &mut $World,
                    $o: &mut $crate::OptionScope<'_, $World>,
                    $a: Args,
                ) -> bool {
                    $o.call_sub($world, NAME, &$a, __body)
                }
            )?

            fn __entry($world: &mut $World, $o: &mut $crate::OptionScope<'_, $World>) {
                __body($world, &Args::default(), $o);
            }

            #[allow(unreachable_code)]
            fn __init_defs(
                _dir: &::std::path::Path,
            ) -> $crate::ConfigResult<::std::boxed::Box<dyn ::std::any::Any + Send>> {
                $(
                    let mut __reader = $crate::DefsReader::open(_dir, NAME)?;
                    let __defs = Defs {
                        $( $lf: __reader.take(stringify!($lf))?, )*
                    };
                    __reader.finish()?;
                    return Ok(::std::boxed::Box::new(__defs));
                )?
                $(
                    return Ok(::std::boxed::Box::new(Defs {
                        $( $df: $ddefault, )*
                    }));
                )?
                Ok(::std::boxed::Box::new(()))
            }

            #[allow(unused_variables, unused_mut)]
            fn __body(
                $world: &mut $World,
                __args: &Args,
                $o: &mut $crate::OptionScope<'_, $World>,
            ) {
                // Argument and variable bookkeeping before any user code.
                $( $( $crate::__ob_render_arg!($o, __args, $af $(, $adefault)?); )* )?
                $( let $dd: Defs = $o.defs::<Defs>(); )?
                $( let $ld: Defs = $o.defs::<Defs>(); )?
                $(
                    let mut __vars_box = $o.take_vars().unwrap_or_else(|| {
                        ::std::boxed::Box::new(Vars::initial())
                            as ::std::boxed::Box<dyn ::std::any::Any + Send>
                    });
                    let $v: &mut Vars = __vars_box
                        .downcast_mut::<Vars>()
                        .expect("state variables changed type");
                    if $o.state_kind() == $crate::StateKind::Initial && $o.option_time() == 0 {
                        *$v = Vars::initial();
                    }
                    $( $o.add_argument(
                        stringify!($vf),
                        (&$crate::render::ArgProbe(&$v.$vf)).text(),
                    ); )*
                )?
                $( let mut $a: Args = ::std::clone::Clone::clone(__args); )?

                $( $( $shared )* )?

                // Common transition: evaluated first; per-state transitions
                // below become its else branch through the latch.
                $(
                    $o.begin_common();
                    $( if $ccond { $o.update_state($ctarget); } else )* {}
                )?

                // Transition pass for the state selected at entry.
                let __sid = $o.state_id();
                $(
                    if __sid == $sname.id {
                        $o.touch_state($sname);
                        $(
                            if $o.begin_transition() {
                                $( if $tcond { $o.update_state($ttarget); } else )* {}
                            }
                        )?
                    }
                )*

                // Action pass for the state selected after transitions.
                let __sid = $o.state_id();
                $(
                    $(
                        if __sid == $sname.id {
                            $o.enter_action();
                            (|| $abody)();
                        }
                    )?
                )*

                $( let _ = &$v; $o.put_vars(__vars_box); )?
            }
        }
    };
}

// ── Expansion helpers (not public API) ────────────────────────────────────────

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_one {
    ($x:ident) => {
        1usize
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_true {
    ($x:ident) => {
        true
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_initial_one {
    (initial_state) => {
        1usize
    };
    ($other:ident) => {
        0usize
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_state_kind {
    (initial_state) => {
        $crate::StateKind::Initial
    };
    (state) => {
        $crate::StateKind::Normal
    };
    (target_state) => {
        $crate::StateKind::Target
    };
    (aborted_state) => {
        $crate::StateKind::Aborted
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_state_id {
    (initial_state, $ord:expr) => {
        $crate::StateId::INITIAL
    };
    ($kind:ident, $ord:expr) => {
        $crate::StateId($ord as u32 + 1)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_default {
    () => {
        ::std::default::Default::default()
    };
    ($default:expr) => {
        $default
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ob_render_arg {
    ($o:ident, $args:ident, $field:ident) => {
        $o.add_argument(
            stringify!($field),
            (&$crate::render::ArgProbe(&$args.$field)).text(),
        );
    };
    ($o:ident, $args:ident, $field:ident, $default:expr) => {
        if !($args.$field == $default) {
            $o.add_argument(
                stringify!($field),
                (&$crate::render::ArgProbe(&$args.$field)).text(),
            );
        }
    };
}
