//! Promise binding.

use super::{BoundAction, GuardExpr, ReferenceKind, ResolveError, ResolvedTransition, Resolver};
use crate::core::{ActionDescriptor, FinallyConfig, PromiseConfig};
use crate::registry::{PromiseEffect, PromiseHandler, PromiseRejection};
use stillwater::prelude::*;

/// A `finally` clause with its guards and actions bound.
#[derive(Clone, Debug)]
pub struct ResolvedFinally<C, E> {
    pub guards: Vec<GuardExpr<C, E>>,
    pub actions: Vec<BoundAction<C, E>>,
    pub description: Option<String>,
}

impl<C, E> ResolvedFinally<C, E> {
    pub fn is_enabled(&self, context: &C, event: &E) -> bool {
        self.guards.iter().all(|guard| guard.evaluate(context, event))
    }
}

/// A promise with its handler and settlement transitions bound.
#[derive(Clone, Debug)]
pub struct ResolvedPromise<C, E> {
    pub src: String,
    /// `None` for a lenient-mode placeholder.
    pub handler: Option<PromiseHandler<C, E>>,
    pub then: Vec<ResolvedTransition<C, E>>,
    pub catch: Vec<ResolvedTransition<C, E>>,
    pub finally: Vec<ResolvedFinally<C, E>>,
    pub description: Option<String>,
}

impl<C, E> ResolvedPromise<C, E> {
    pub fn is_placeholder(&self) -> bool {
        self.handler.is_none()
    }

    /// Start the promise. A placeholder always rejects, sending the
    /// runtime down the `catch` branch.
    pub fn invoke(&self, context: &C, event: &E) -> PromiseEffect {
        match &self.handler {
            Some(handler) => handler.invoke(context, event),
            None => fail(PromiseRejection::new(format!(
                "no promise handler registered for '{}'",
                self.src
            )))
            .boxed(),
        }
    }
}

impl<'a, C, E> Resolver<'a, C, E> {
    fn resolve_finally(
        &mut self,
        finally: &FinallyConfig,
        path: &str,
    ) -> Result<ResolvedFinally<C, E>, ResolveError> {
        match finally {
            FinallyConfig::Action(name) => Ok(ResolvedFinally {
                guards: Vec::new(),
                actions: vec![self.resolve_action(ActionDescriptor::named(name), path)?],
                description: None,
            }),
            FinallyConfig::Detailed(detail) => Ok(ResolvedFinally {
                guards: self.resolve_guards(detail.guards.as_slice(), path)?,
                actions: self.resolve_action_configs(detail.actions.as_slice(), path)?,
                description: detail.description.clone(),
            }),
        }
    }

    pub(super) fn resolve_promise(
        &mut self,
        promise: &PromiseConfig,
        path: &str,
    ) -> Result<ResolvedPromise<C, E>, ResolveError> {
        let handler = self.registry.promise(&promise.src).cloned();
        if handler.is_none() {
            self.unresolved(ReferenceKind::Promise, &promise.src, path)?;
        }

        let then = self.resolve_transitions(promise.then.as_slice(), path)?;
        let catch = self.resolve_transitions(promise.catch.as_slice(), path)?;
        let finally = promise
            .finally
            .iter()
            .map(|clause| self.resolve_finally(clause, path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedPromise {
            src: promise.src.clone(),
            handler,
            then,
            catch,
            finally,
            description: promise.description.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{normalize, StateNodeConfig};
    use crate::options::{CompileOptions, Strictness};
    use crate::registry::MachineOptions;
    use crate::resolve::{resolve, resolve_with, ResolvedTarget};
    use serde_json::json;

    fn registry() -> MachineOptions<u32, ()> {
        MachineOptions::new()
            .with_promise("fetch", |count: &u32, _: &()| pure(json!({ "count": count })).boxed())
            .with_action("reset", |_: &u32, _: &()| 0)
            .with_guard("positive", |count: &u32, _: &()| *count > 0)
    }

    fn config() -> StateNodeConfig {
        serde_json::from_value(json!({
            "initial": "loading",
            "states": {
                "loading": {
                    "promises": {
                        "src": "fetch",
                        "then": "done",
                        "catch": { "target": "failed", "actions": "reset" },
                        "finally": ["reset", { "actions": "reset", "guards": "positive" }]
                    }
                },
                "done": {},
                "failed": {}
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn resolved_promise_runs_registered_handler() {
        let tree = resolve(&normalize(&config()), &registry(), Strictness::Strict).unwrap();
        let promise = &tree.states().unwrap()["loading"].promises[0];

        assert!(!promise.is_placeholder());
        let payload = promise.invoke(&3, &()).run(&()).await.unwrap();
        assert_eq!(payload, json!({ "count": 3 }));
    }

    #[test]
    fn settlement_transitions_resolve_like_any_other() {
        let tree = resolve(&normalize(&config()), &registry(), Strictness::Strict).unwrap();
        let promise = &tree.states().unwrap()["loading"].promises[0];

        assert_eq!(promise.then[0].target, Some(ResolvedTarget::Path("/done".into())));
        assert_eq!(promise.catch[0].actions[0].name(), "reset");
        assert_eq!(promise.finally.len(), 2);
        assert!(promise.finally[0].is_enabled(&0, &()));
        assert!(!promise.finally[1].is_enabled(&0, &()));
        assert!(promise.finally[1].is_enabled(&1, &()));
    }

    #[test]
    fn strict_mode_rejects_unknown_source() {
        let registry: MachineOptions<u32, ()> = MachineOptions::new();
        let error = resolve(&normalize(&config()), &registry, Strictness::Strict).unwrap_err();

        assert_eq!(
            error,
            ResolveError::UnresolvedReference {
                kind: ReferenceKind::Promise,
                name: "fetch".into(),
                path: "/loading".into(),
            }
        );
    }

    #[tokio::test]
    async fn placeholder_promise_rejects() {
        let registry: MachineOptions<u32, ()> = MachineOptions::new();
        let resolution =
            resolve_with(&normalize(&config()), &registry, &CompileOptions::lenient()).unwrap();
        let promise = &resolution.tree.states().unwrap()["loading"].promises[0];

        assert!(promise.is_placeholder());
        let rejection = promise.invoke(&1, &()).run(&()).await.unwrap_err();
        assert!(rejection.reason.contains("fetch"));
        // fetch, reset (catch), reset + reset + positive (finally)
        assert_eq!(resolution.issues.len(), 5);
    }
}
