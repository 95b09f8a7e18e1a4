//! Action binding.

use super::{ReferenceKind, ResolveError, Resolver};
use crate::core::{ActionConfig, ActionDescriptor};
use crate::registry::Action;

/// An action descriptor bound to its implementation.
///
/// `action` is `None` for a lenient-mode placeholder, which leaves the
/// context untouched when applied.
#[derive(Clone, Debug)]
pub struct BoundAction<C, E> {
    pub descriptor: ActionDescriptor,
    pub action: Option<Action<C, E>>,
}

impl<C, E> BoundAction<C, E> {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn is_placeholder(&self) -> bool {
        self.action.is_none()
    }

    pub fn apply(&self, context: &C, event: &E) -> C
    where
        C: Clone,
    {
        match &self.action {
            Some(action) => action.apply(context, event),
            None => context.clone(),
        }
    }
}

impl<'a, C, E> Resolver<'a, C, E> {
    pub(super) fn resolve_action(
        &mut self,
        descriptor: ActionDescriptor,
        path: &str,
    ) -> Result<BoundAction<C, E>, ResolveError> {
        let action = self.registry.action(&descriptor.name).cloned();
        if action.is_none() {
            self.unresolved(ReferenceKind::Action, &descriptor.name, path)?;
        }
        Ok(BoundAction { descriptor, action })
    }

    pub(super) fn resolve_actions(
        &mut self,
        descriptors: &[ActionDescriptor],
        path: &str,
    ) -> Result<Vec<BoundAction<C, E>>, ResolveError> {
        descriptors
            .iter()
            .map(|descriptor| self.resolve_action(descriptor.clone(), path))
            .collect()
    }

    /// Bind actions still in authored form (transition and `finally` actions).
    pub(super) fn resolve_action_configs(
        &mut self,
        actions: &[ActionConfig],
        path: &str,
    ) -> Result<Vec<BoundAction<C, E>>, ResolveError> {
        actions
            .iter()
            .map(|action| self.resolve_action(action.to_descriptor(), path))
            .collect()
    }
}
