//! The option catalogue: descriptors, the read-only set, and its builder.
//!
//! # Sharing model
//!
//! An [`OptionSet`] is built once (typically at program start) and is
//! immutable afterwards, so several behavior instances — even on different
//! threads — can share one set behind an `Arc`. Per-option *state* never
//! lives here; it lives in each instance's context table, indexed by the
//! [`OptionId`] the set assigned at registration.
//!
//! # Name dispatch
//!
//! Only argument-less options can be invoked by name (roots and
//! `select_option` entries): an option declared with `args` has no uniform
//! entry point, so its descriptor carries `entry: None` and by-name
//! invocation treats it like an unknown name. Options with arguments are
//! called through the typed `call` wrapper their `option!` expansion
//! generates.

use std::any::Any;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use ob_config::ConfigResult;
use ob_core::OptionId;

use crate::scope::OptionScope;
use crate::{EngineError, EngineResult};

/// An option body as stored in the catalogue: argument-less entry point.
pub type OptionBody<W> = fn(&mut W, &mut OptionScope<'_, W>);

/// A one-time definitions initializer; receives the definitions directory.
pub type DefsInit = fn(&Path) -> ConfigResult<Box<dyn Any + Send>>;

// ── OptionDescriptor ──────────────────────────────────────────────────────────

/// Immutable registration record for one option.
///
/// Generated by the `descriptor()` function of every `option!` expansion;
/// hand-rolling one is only useful in tests.
pub struct OptionDescriptor<W> {
    /// Unique registration name.
    pub name: &'static str,
    /// By-name entry point; `None` for options that require arguments.
    pub entry: Option<OptionBody<W>>,
    /// Definitions initializer, run once by the first `begin_frame`.
    pub defs_init: Option<DefsInit>,
    /// Whether the body declares any states. Stateless options behave as
    /// plain functions: no initial-state reset, no activation-graph node.
    pub has_states: bool,
}

impl<W> OptionDescriptor<W> {
    /// Two descriptors are interchangeable if every field matches; duplicate
    /// registrations of the same option are accepted on that basis.
    fn same_as(&self, other: &Self) -> bool {
        self.name == other.name
            && self.entry == other.entry
            && self.defs_init == other.defs_init
            && self.has_states == other.has_states
    }
}

// Manual impls: `W` only appears inside `fn` pointers, which are `Copy`
// regardless of `W`, so no `W: Clone` bound is wanted.
impl<W> Clone for OptionDescriptor<W> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<W> Copy for OptionDescriptor<W> {}

// ── OptionSet ─────────────────────────────────────────────────────────────────

/// The read-only catalogue of every option a behavior can run.
///
/// Always contains the sentinel option `"none"`, which never executes: it
/// exists so option lists can say "nothing" explicitly, and invoking it
/// reports "declined" like an option that stayed in its initial state.
pub struct OptionSet<W> {
    descriptors: Vec<OptionDescriptor<W>>,
    by_name: HashMap<&'static str, OptionId>,
}

impl<W> OptionSet<W> {
    pub fn builder() -> OptionSetBuilder<W> {
        OptionSetBuilder {
            descriptors: Vec::new(),
        }
    }

    /// Number of registered options (including `"none"`).
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Look up the id an option was registered under.
    pub fn resolve(&self, name: &str) -> Option<OptionId> {
        self.by_name.get(name).copied()
    }

    pub fn descriptor(&self, id: OptionId) -> &OptionDescriptor<W> {
        &self.descriptors[id.index()]
    }

    /// All definitions initializers, in registration order.
    pub(crate) fn initializers(&self) -> impl Iterator<Item = (OptionId, DefsInit)> + '_ {
        self.descriptors
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.defs_init.map(|init| (OptionId(i as u32), init)))
    }
}

// ── OptionSetBuilder ──────────────────────────────────────────────────────────

/// Collects descriptors and validates them into an [`OptionSet`].
///
/// Registration is idempotent: handing in the same descriptor twice is fine,
/// two different options under one name is a build error.
pub struct OptionSetBuilder<W> {
    descriptors: Vec<OptionDescriptor<W>>,
}

impl<W> OptionSetBuilder<W> {
    pub fn option(mut self, descriptor: OptionDescriptor<W>) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn build(self) -> EngineResult<Arc<OptionSet<W>>> {
        let mut kept: Vec<OptionDescriptor<W>> = vec![OptionDescriptor {
            name: "none",
            entry: None,
            defs_init: None,
            has_states: false,
        }];
        let mut by_name = HashMap::new();
        by_name.insert("none", OptionId(0));

        for descriptor in self.descriptors {
            match by_name.get(descriptor.name) {
                Some(&id) if kept[id.index()].same_as(&descriptor) => {}
                Some(_) => {
                    return Err(EngineError::ConflictingOption {
                        name: descriptor.name,
                    })
                }
                None => {
                    by_name.insert(descriptor.name, OptionId(kept.len() as u32));
                    kept.push(descriptor);
                }
            }
        }

        Ok(Arc::new(OptionSet {
            descriptors: kept,
            by_name,
        }))
    }
}
