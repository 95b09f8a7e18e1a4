//! One-shot compilation of a config into a ready-to-run definition.
//!
//! [`MachineDefinition::compile`] chains the passes:
//! normalize → resolve → initial value. The result is built once per
//! machine and shared by every execution of it.

pub mod error;

pub use error::MachineError;

use crate::checkpoint::Checkpoint;
use crate::core::{
    flatten, normalize, to_state_map, CanonicalStateNode, FlatStateMap, StateMap, StateNodeConfig,
    StateValue,
};
use crate::initial::initial_value_with;
use crate::options::CompileOptions;
use crate::registry::MachineOptions;
use crate::resolve::{resolve_with, ResolveError, ResolvedStateNode};
use std::collections::HashSet;
use tracing::debug;

/// A compiled machine: canonical and resolved trees plus the initial
/// snapshot.
#[derive(Clone, Debug)]
pub struct MachineDefinition<C, E> {
    pub canonical: CanonicalStateNode,
    pub resolved: ResolvedStateNode<C, E>,
    pub initial: StateValue,
    /// References lenient mode replaced with placeholders.
    pub issues: Vec<ResolveError>,
    pub options: CompileOptions,
}

impl<C, E> MachineDefinition<C, E> {
    /// Compile `config` against `registry`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statetree::core::StateNodeConfig;
    /// use statetree::machine::MachineDefinition;
    /// use statetree::registry::MachineOptions;
    /// use statetree::CompileOptions;
    ///
    /// let config = StateNodeConfig::compound("idle")
    ///     .state("idle", StateNodeConfig::atomic().on("START", "running"))
    ///     .state("running", StateNodeConfig::atomic());
    /// let registry: MachineOptions<(), ()> = MachineOptions::new();
    ///
    /// let machine = MachineDefinition::compile(&config, &registry, CompileOptions::strict()).unwrap();
    /// assert_eq!(machine.initial.as_leaf(), Some("idle"));
    /// assert!(machine.issues.is_empty());
    /// ```
    pub fn compile(
        config: &StateNodeConfig,
        registry: &MachineOptions<C, E>,
        options: CompileOptions,
    ) -> Result<Self, MachineError> {
        debug!(strictness = ?options.strictness, delimiter = %options.delimiter, "compiling machine");

        let canonical = normalize(config);
        let resolution = resolve_with(&canonical, registry, &options)?;
        let initial = initial_value_with(&canonical, &options.delimiter)?;

        debug!(initial = %initial, issues = resolution.issues.len(), "compiled machine");

        Ok(Self {
            canonical,
            resolved: resolution.tree,
            initial,
            issues: resolution.issues,
            options,
        })
    }

    /// `id` declared on the root node, if any.
    pub fn id(&self) -> Option<&str> {
        self.canonical.id.as_deref()
    }

    pub fn state_map(&self) -> StateMap {
        to_state_map(&self.canonical)
    }

    /// Every state path of the machine, depth-first.
    pub fn paths(&self) -> Vec<String> {
        flatten(&self.canonical, &self.options.delimiter)
            .into_keys()
            .collect()
    }

    /// Snapshot of the initial state value.
    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoint_value(self.initial.clone())
    }

    /// Snapshot of an arbitrary state value of this machine.
    pub fn checkpoint_value(&self, value: StateValue) -> Checkpoint {
        let checkpoint = Checkpoint::new(value);
        match self.id() {
            Some(id) => checkpoint.for_machine(id),
            None => checkpoint,
        }
    }

    /// Recover the state value held by `checkpoint`, checking that every
    /// active path in it exists in this machine.
    pub fn restore(&self, checkpoint: &Checkpoint) -> Result<StateValue, MachineError> {
        let known: HashSet<String> = self.paths().into_iter().collect();

        if let Some(path) = checkpoint
            .value
            .paths(&self.options.delimiter)
            .into_iter()
            .find(|path| !known.contains(path))
        {
            return Err(MachineError::UnknownState { path });
        }

        debug!(checkpoint = %checkpoint.id, value = %checkpoint.value, "restored checkpoint");
        Ok(checkpoint.value.clone())
    }

    /// Restore from a JSON-encoded checkpoint.
    pub fn restore_json(&self, json: &str) -> Result<StateValue, MachineError> {
        let checkpoint = Checkpoint::from_json(json)?;
        self.restore(&checkpoint)
    }
}

impl<C: Clone, E: Clone> MachineDefinition<C, E> {
    /// Path-addressed view of the resolved tree.
    pub fn flat_map(&self) -> FlatStateMap<ResolvedStateNode<C, E>> {
        flatten(&self.resolved, &self.options.delimiter)
    }
}
