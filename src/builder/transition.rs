//! Builder for constructing transition configs.

use crate::builder::error::BuildError;
use crate::core::{ActionConfig, GuardConfig, OneOrMany, TransitionConfig, TransitionDetail};

/// Builder for constructing transitions with a fluent API.
#[derive(Debug, Default)]
pub struct TransitionBuilder {
    target: Option<String>,
    guards: Vec<GuardConfig>,
    actions: Vec<ActionConfig>,
    in_states: Vec<String>,
    description: Option<String>,
}

impl TransitionBuilder {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target path. Absolute when it starts with the delimiter,
    /// otherwise a sibling key.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Add a guard (optional). Every guard must pass.
    pub fn guard(mut self, guard: impl Into<GuardConfig>) -> Self {
        self.guards.push(guard.into());
        self
    }

    /// Add an `{ or: [...] }` guard over the given names.
    pub fn guard_any<I, G>(mut self, guards: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GuardConfig>,
    {
        self.guards.push(GuardConfig::Or {
            or: guards.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add an action run when the transition is taken.
    pub fn action(mut self, action: impl Into<ActionConfig>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Require a state to be active for the transition to be enabled.
    pub fn in_state(mut self, path: impl Into<String>) -> Self {
        self.in_states.push(path.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the transition.
    ///
    /// A transition with only a target is emitted in its bare string form.
    pub fn build(self) -> Result<TransitionConfig, BuildError> {
        if self.target.is_none() && self.actions.is_empty() {
            return Err(BuildError::EmptyTransition);
        }

        let bare = self.guards.is_empty()
            && self.actions.is_empty()
            && self.in_states.is_empty()
            && self.description.is_none();

        match self.target {
            Some(target) if bare => Ok(TransitionConfig::Target(target)),
            target => Ok(TransitionConfig::Detailed(TransitionDetail {
                target,
                guards: OneOrMany::Many(self.guards),
                actions: OneOrMany::Many(self.actions),
                in_states: OneOrMany::Many(self.in_states),
                description: self.description,
            })),
        }
    }
}
