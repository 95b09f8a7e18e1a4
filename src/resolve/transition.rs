//! Transition binding: guards, targets and transition actions.

use super::{BoundAction, ReferenceKind, ResolveError, Resolver};
use crate::core::{GuardConfig, TransitionConfig};
use crate::registry::Guard;
use indexmap::IndexMap;

/// A guard reference bound to its predicate(s).
#[derive(Clone, Debug)]
pub enum GuardExpr<C, E> {
    Bound { name: String, guard: Guard<C, E> },
    /// Lenient-mode stand-in for a missing guard. Never passes.
    Placeholder { name: String },
    All(Vec<GuardExpr<C, E>>),
    Any(Vec<GuardExpr<C, E>>),
}

impl<C, E> GuardExpr<C, E> {
    pub fn evaluate(&self, context: &C, event: &E) -> bool {
        match self {
            Self::Bound { guard, .. } => guard.check(context, event),
            Self::Placeholder { .. } => false,
            Self::All(guards) => guards.iter().all(|g| g.evaluate(context, event)),
            Self::Any(guards) => guards.iter().any(|g| g.evaluate(context, event)),
        }
    }
}

/// A state path referenced by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// Absolute path of an existing state.
    Path(String),
    /// Lenient-mode stand-in: the target as written, matching no state.
    Unresolved(String),
}

impl ResolvedTarget {
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            Self::Unresolved(_) => None,
        }
    }
}

/// A transition with its guards, actions and target bound.
#[derive(Clone, Debug)]
pub struct ResolvedTransition<C, E> {
    pub target: Option<ResolvedTarget>,
    /// All must pass for the transition to be enabled.
    pub guards: Vec<GuardExpr<C, E>>,
    pub actions: Vec<BoundAction<C, E>>,
    pub in_states: Vec<ResolvedTarget>,
    pub description: Option<String>,
}

impl<C, E> ResolvedTransition<C, E> {
    /// Check the guards. `in` state conditions are left to the runtime,
    /// which knows the current state value.
    pub fn is_enabled(&self, context: &C, event: &E) -> bool {
        self.guards.iter().all(|guard| guard.evaluate(context, event))
    }

    /// A transition without a target only runs its actions.
    pub fn is_targetless(&self) -> bool {
        self.target.is_none()
    }
}

impl<'a, C, E> Resolver<'a, C, E> {
    pub(super) fn resolve_guard(
        &mut self,
        guard: &GuardConfig,
        path: &str,
    ) -> Result<GuardExpr<C, E>, ResolveError> {
        match guard {
            GuardConfig::Named(name) => match self.registry.guard(name) {
                Some(bound) => Ok(GuardExpr::Bound {
                    name: name.clone(),
                    guard: bound.clone(),
                }),
                None => {
                    self.unresolved(ReferenceKind::Guard, name, path)?;
                    Ok(GuardExpr::Placeholder { name: name.clone() })
                }
            },
            GuardConfig::And { and } => Ok(GuardExpr::All(self.resolve_guards(and, path)?)),
            GuardConfig::Or { or } => Ok(GuardExpr::Any(self.resolve_guards(or, path)?)),
        }
    }

    pub(super) fn resolve_guards(
        &mut self,
        guards: &[GuardConfig],
        path: &str,
    ) -> Result<Vec<GuardExpr<C, E>>, ResolveError> {
        guards
            .iter()
            .map(|guard| self.resolve_guard(guard, path))
            .collect()
    }

    /// Resolve a target written on the node at `path`.
    ///
    /// Targets starting with the delimiter are absolute; anything else
    /// names a sibling of the owning node.
    fn resolve_target(&mut self, target: &str, path: &str) -> Result<ResolvedTarget, ResolveError> {
        let absolute = if target.starts_with(self.delimiter) {
            target.to_string()
        } else {
            let parent = path
                .rsplit_once(self.delimiter)
                .map_or("", |(parent, _)| parent);
            format!("{parent}{}{target}", self.delimiter)
        };

        if self.paths.contains(&absolute) {
            Ok(ResolvedTarget::Path(absolute))
        } else {
            self.unresolved(ReferenceKind::Target, target, path)?;
            Ok(ResolvedTarget::Unresolved(target.to_string()))
        }
    }

    pub(super) fn resolve_transition(
        &mut self,
        transition: &TransitionConfig,
        path: &str,
    ) -> Result<ResolvedTransition<C, E>, ResolveError> {
        let detail = transition.to_detail();

        let target = detail
            .target
            .as_deref()
            .map(|target| self.resolve_target(target, path))
            .transpose()?;
        let guards = self.resolve_guards(detail.guards.as_slice(), path)?;
        let actions = self.resolve_action_configs(detail.actions.as_slice(), path)?;
        let in_states = detail
            .in_states
            .iter()
            .map(|state| self.resolve_target(state, path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedTransition {
            target,
            guards,
            actions,
            in_states,
            description: detail.description,
        })
    }

    pub(super) fn resolve_transitions(
        &mut self,
        transitions: &[TransitionConfig],
        path: &str,
    ) -> Result<Vec<ResolvedTransition<C, E>>, ResolveError> {
        transitions
            .iter()
            .map(|transition| self.resolve_transition(transition, path))
            .collect()
    }

    pub(super) fn resolve_transition_map(
        &mut self,
        map: &IndexMap<String, Vec<TransitionConfig>>,
        path: &str,
    ) -> Result<IndexMap<String, Vec<ResolvedTransition<C, E>>>, ResolveError> {
        map.iter()
            .map(|(key, transitions)| {
                self.resolve_transitions(transitions, path)
                    .map(|resolved| (key.clone(), resolved))
            })
            .collect()
    }
}
