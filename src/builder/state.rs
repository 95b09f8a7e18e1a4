//! Fluent constructors for state node configs.

use crate::core::{
    ActionConfig, OneOrMany, PromiseConfig, StateKind, StateNodeConfig, TransitionConfig,
};
use indexmap::IndexMap;

impl StateNodeConfig {
    /// A leaf state.
    pub fn atomic() -> Self {
        Self {
            r#type: Some(StateKind::Atomic),
            ..Self::default()
        }
    }

    /// A state with exclusive children, starting in `initial`.
    pub fn compound(initial: impl Into<String>) -> Self {
        Self {
            r#type: Some(StateKind::Compound),
            initial: Some(initial.into()),
            states: Some(IndexMap::new()),
            ..Self::default()
        }
    }

    /// A state whose children are all active at once.
    pub fn parallel() -> Self {
        Self {
            r#type: Some(StateKind::Parallel),
            states: Some(IndexMap::new()),
            ..Self::default()
        }
    }

    /// Add (or replace) a child state.
    pub fn state(mut self, key: impl Into<String>, child: StateNodeConfig) -> Self {
        self.states
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), child);
        self
    }

    pub fn entry(mut self, action: impl Into<ActionConfig>) -> Self {
        self.entry.push(action.into());
        self
    }

    pub fn exit(mut self, action: impl Into<ActionConfig>) -> Self {
        self.exit.push(action.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a transition for `event`. Repeated calls accumulate, and the
    /// first enabled transition wins at runtime.
    pub fn on(mut self, event: impl Into<String>, transition: impl Into<TransitionConfig>) -> Self {
        push_transition(&mut self.on, event.into(), transition.into());
        self
    }

    /// Add a delayed transition keyed by a named delay.
    pub fn after(mut self, delay: impl Into<String>, transition: impl Into<TransitionConfig>) -> Self {
        push_transition(&mut self.after, delay.into(), transition.into());
        self
    }

    /// Add an eventless transition.
    pub fn always(mut self, transition: impl Into<TransitionConfig>) -> Self {
        self.always.push(transition.into());
        self
    }

    pub fn promise(mut self, promise: PromiseConfig) -> Self {
        self.promises.push(promise);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn push_transition(
    map: &mut IndexMap<String, OneOrMany<TransitionConfig>>,
    key: String,
    transition: TransitionConfig,
) {
    map.entry(key).or_default().push(transition);
}
