//! Capability registry: named actions, guards and promise handlers.
//!
//! The registry is owned by the caller and only ever read during
//! resolution, so one registry can back any number of concurrent
//! resolutions.

mod action;
mod guard;
mod promise;

pub use action::Action;
pub use guard::Guard;
pub use promise::{PromiseEffect, PromiseHandler, PromiseRejection};

use std::collections::HashMap;
use std::fmt;

/// Implementations that symbolic references in a config resolve against.
///
/// # Example
///
/// ```rust
/// use statetree::registry::MachineOptions;
/// use stillwater::prelude::*;
///
/// #[derive(Clone, Debug, Default)]
/// struct Context {
///     count: u32,
/// }
///
/// let options: MachineOptions<Context, ()> = MachineOptions::new()
///     .with_action("increment", |ctx: &Context, _: &()| Context { count: ctx.count + 1 })
///     .with_guard("below_ten", |ctx: &Context, _: &()| ctx.count < 10)
///     .with_promise("fetch", |_: &Context, _: &()| pure(serde_json::json!({ "ok": true })).boxed());
///
/// assert!(options.action("increment").is_some());
/// assert!(options.guard("missing").is_none());
/// ```
pub struct MachineOptions<C, E> {
    pub actions: HashMap<String, Action<C, E>>,
    pub guards: HashMap<String, Guard<C, E>>,
    pub promises: HashMap<String, PromiseHandler<C, E>>,
}

impl<C, E> MachineOptions<C, E> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            guards: HashMap::new(),
            promises: HashMap::new(),
        }
    }

    pub fn with_action<F>(mut self, name: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&C, &E) -> C + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Action::new(apply));
        self
    }

    pub fn with_guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, &E) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    pub fn with_promise<F>(mut self, name: impl Into<String>, start: F) -> Self
    where
        F: Fn(&C, &E) -> PromiseEffect + Send + Sync + 'static,
    {
        self.promises.insert(name.into(), PromiseHandler::new(start));
        self
    }

    pub fn action(&self, name: &str) -> Option<&Action<C, E>> {
        self.actions.get(name)
    }

    pub fn guard(&self, name: &str) -> Option<&Guard<C, E>> {
        self.guards.get(name)
    }

    pub fn promise(&self, name: &str) -> Option<&PromiseHandler<C, E>> {
        self.promises.get(name)
    }
}

impl<C, E> Default for MachineOptions<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> Clone for MachineOptions<C, E> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            guards: self.guards.clone(),
            promises: self.promises.clone(),
        }
    }
}

impl<C, E> fmt::Debug for MachineOptions<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineOptions")
            .field("actions", &sorted_names(&self.actions))
            .field("guards", &sorted_names(&self.guards))
            .field("promises", &sorted_names(&self.promises))
            .finish()
    }
}

fn sorted_names<V>(map: &HashMap<String, V>) -> Vec<&String> {
    let mut names: Vec<_> = map.keys().collect();
    names.sort();
    names
}
