//! Binding a canonical tree to a capability registry.
//!
//! Resolution walks the canonical tree depth-first and replaces every
//! symbolic reference (action, guard, promise, transition target) with
//! what it points at. One algorithm serves both policies:
//! - [`Strictness::Strict`]: the first unresolved reference aborts the
//!   whole resolution, no partial tree is returned
//! - [`Strictness::Lenient`]: unresolved references become inert
//!   placeholders and are reported alongside the tree
//!
//! The registry and policy travel through the recursion in an explicit,
//! read-only resolver context rather than ambient state.

mod action;
pub mod error;
mod promise;
mod transition;

pub use action::BoundAction;
pub use error::{ReferenceKind, ResolveError};
pub use promise::{ResolvedFinally, ResolvedPromise};
pub use transition::{GuardExpr, ResolvedTarget, ResolvedTransition};

use crate::core::{
    child_path, display_path, flatten, CanonicalStateNode, StateKind, StateNodeKind, StateTree,
};
use crate::options::{CompileOptions, Strictness, DEFAULT_DELIMITER};
use crate::registry::MachineOptions;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// A canonical node with every reference bound.
///
/// This is the artifact handed to the runtime engine.
#[derive(Clone, Debug)]
pub struct ResolvedStateNode<C, E> {
    pub key: Option<String>,
    pub id: Option<String>,
    pub description: Option<String>,
    pub body: StateNodeKind<ResolvedStateNode<C, E>>,
    pub entry: Vec<BoundAction<C, E>>,
    pub exit: Vec<BoundAction<C, E>>,
    pub tags: Vec<String>,
    pub on: IndexMap<String, Vec<ResolvedTransition<C, E>>>,
    pub after: IndexMap<String, Vec<ResolvedTransition<C, E>>>,
    pub always: Vec<ResolvedTransition<C, E>>,
    pub promises: Vec<ResolvedPromise<C, E>>,
}

impl<C, E> ResolvedStateNode<C, E> {
    pub fn kind(&self) -> StateKind {
        self.body.kind()
    }

    pub fn initial(&self) -> Option<&str> {
        self.body.initial()
    }

    pub fn states(&self) -> Option<&IndexMap<String, ResolvedStateNode<C, E>>> {
        self.body.states()
    }
}

impl<C: Clone, E: Clone> StateTree for ResolvedStateNode<C, E> {
    fn kind(&self) -> StateKind {
        self.body.kind()
    }

    fn initial(&self) -> Option<&str> {
        self.body.initial()
    }

    fn children(&self) -> Option<&IndexMap<String, Self>> {
        self.body.states()
    }

    fn with_children(&self, children: IndexMap<String, Self>) -> Self {
        Self {
            key: self.key.clone(),
            id: self.id.clone(),
            description: self.description.clone(),
            body: self.body.with_states(children),
            entry: self.entry.clone(),
            exit: self.exit.clone(),
            tags: self.tags.clone(),
            on: self.on.clone(),
            after: self.after.clone(),
            always: self.always.clone(),
            promises: self.promises.clone(),
        }
    }
}

/// A resolved tree plus the references lenient mode papered over.
#[derive(Debug)]
pub struct Resolution<C, E> {
    pub tree: ResolvedStateNode<C, E>,
    /// Always empty under strict mode.
    pub issues: Vec<ResolveError>,
}

/// Read-only context threaded through the recursive resolver.
pub(crate) struct Resolver<'a, C, E> {
    registry: &'a MachineOptions<C, E>,
    strictness: Strictness,
    delimiter: &'a str,
    /// Every path in the tree being resolved, for target validation.
    paths: HashSet<String>,
    issues: Vec<ResolveError>,
}

impl<'a, C, E> Resolver<'a, C, E> {
    fn new(
        root: &CanonicalStateNode,
        registry: &'a MachineOptions<C, E>,
        options: &'a CompileOptions,
    ) -> Self {
        Self {
            registry,
            strictness: options.strictness,
            delimiter: &options.delimiter,
            paths: flatten(root, &options.delimiter).into_keys().collect(),
            issues: Vec::new(),
        }
    }

    /// Report a reference that matched nothing.
    ///
    /// Under strict mode this is the error that aborts resolution; under
    /// lenient mode it is recorded and the caller substitutes a placeholder.
    fn unresolved(
        &mut self,
        kind: ReferenceKind,
        name: &str,
        path: &str,
    ) -> Result<(), ResolveError> {
        let error = ResolveError::UnresolvedReference {
            kind,
            name: name.to_string(),
            path: display_path(path, self.delimiter),
        };

        match self.strictness {
            Strictness::Strict => Err(error),
            Strictness::Lenient => {
                warn!(
                    %kind,
                    reference = name,
                    path = %error.path(),
                    "unresolved reference replaced by placeholder"
                );
                self.issues.push(error);
                Ok(())
            }
        }
    }

    fn resolve_node(
        &mut self,
        node: &CanonicalStateNode,
        path: &str,
    ) -> Result<ResolvedStateNode<C, E>, ResolveError> {
        trace!(path = %display_path(path, self.delimiter), kind = %node.kind(), "resolving state node");

        let entry = self.resolve_actions(&node.entry, path)?;
        let exit = self.resolve_actions(&node.exit, path)?;
        let on = self.resolve_transition_map(&node.on, path)?;
        let after = self.resolve_transition_map(&node.after, path)?;
        let always = self.resolve_transitions(&node.always, path)?;
        let promises = node
            .promises
            .iter()
            .map(|promise| self.resolve_promise(promise, path))
            .collect::<Result<Vec<_>, _>>()?;

        let body = match &node.body {
            StateNodeKind::Atomic => StateNodeKind::Atomic,
            StateNodeKind::Compound { initial, states } => StateNodeKind::Compound {
                initial: initial.clone(),
                states: self.resolve_children(states, path)?,
            },
            StateNodeKind::Parallel { states } => StateNodeKind::Parallel {
                states: self.resolve_children(states, path)?,
            },
        };

        Ok(ResolvedStateNode {
            key: node.key.clone(),
            id: node.id.clone(),
            description: node.description.clone(),
            body,
            entry,
            exit,
            tags: node.tags.clone(),
            on,
            after,
            always,
            promises,
        })
    }

    fn resolve_children(
        &mut self,
        states: &IndexMap<String, CanonicalStateNode>,
        path: &str,
    ) -> Result<IndexMap<String, ResolvedStateNode<C, E>>, ResolveError> {
        states
            .iter()
            .map(|(key, child)| {
                let nested = child_path(path, self.delimiter, key);
                self.resolve_node(child, &nested)
                    .map(|resolved| (key.clone(), resolved))
            })
            .collect()
    }
}

/// Resolve a canonical tree with the default delimiter.
///
/// # Example
///
/// ```rust
/// use statetree::core::{normalize, StateNodeConfig};
/// use statetree::registry::MachineOptions;
/// use statetree::resolve::resolve;
/// use statetree::Strictness;
///
/// let config: StateNodeConfig =
///     serde_json::from_value(serde_json::json!({ "entry": "doesNotExist" })).unwrap();
/// let canonical = normalize(&config);
/// let registry: MachineOptions<(), ()> = MachineOptions::new();
///
/// let error = resolve(&canonical, &registry, Strictness::Strict).unwrap_err();
/// assert_eq!(error.name(), "doesNotExist");
///
/// let lenient = resolve(&canonical, &registry, Strictness::Lenient).unwrap();
/// assert!(lenient.entry[0].is_placeholder());
/// ```
pub fn resolve<C, E>(
    config: &CanonicalStateNode,
    registry: &MachineOptions<C, E>,
    strictness: Strictness,
) -> Result<ResolvedStateNode<C, E>, ResolveError> {
    let options = CompileOptions::new()
        .with_strictness(strictness)
        .with_delimiter(DEFAULT_DELIMITER);
    resolve_with(config, registry, &options).map(|resolution| resolution.tree)
}

/// Resolve a canonical tree, returning the lenient-mode issues too.
pub fn resolve_with<C, E>(
    config: &CanonicalStateNode,
    registry: &MachineOptions<C, E>,
    options: &CompileOptions,
) -> Result<Resolution<C, E>, ResolveError> {
    debug!(strictness = ?options.strictness, "resolving state tree");
    let mut resolver = Resolver::new(config, registry, options);
    let tree = resolver.resolve_node(config, "")?;

    debug!(
        paths = resolver.paths.len(),
        issues = resolver.issues.len(),
        "resolved state tree"
    );

    Ok(Resolution {
        tree,
        issues: resolver.issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{normalize, StateNodeConfig};
    use serde_json::json;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Context {
        log: Vec<String>,
    }

    #[derive(Clone, Debug)]
    struct Event;

    fn registry() -> MachineOptions<Context, Event> {
        MachineOptions::new()
            .with_action("record", |ctx: &Context, _: &Event| {
                let mut log = ctx.log.clone();
                log.push("record".to_string());
                Context { log }
            })
            .with_guard("always_true", |_: &Context, _: &Event| true)
    }

    fn canonical(value: serde_json::Value) -> CanonicalStateNode {
        let config: StateNodeConfig = serde_json::from_value(value).unwrap();
        normalize(&config)
    }

    #[test]
    fn resolve_binds_entry_and_exit_actions() {
        let tree = resolve(
            &canonical(json!({ "entry": "record", "exit": ["record"] })),
            &registry(),
            Strictness::Strict,
        )
        .unwrap();

        assert_eq!(tree.entry.len(), 1);
        assert!(!tree.entry[0].is_placeholder());
        let next = tree.exit[0].apply(&Context::default(), &Event);
        assert_eq!(next.log, vec!["record".to_string()]);
    }

    #[test]
    fn resolve_preserves_structure_and_metadata() {
        let tree = resolve(
            &canonical(json!({
                "id": "machine",
                "description": "Root",
                "initial": "a",
                "states": {
                    "a": { "tags": ["busy"] },
                    "b": { "type": "parallel", "states": { "x": {}, "y": {} } }
                }
            })),
            &registry(),
            Strictness::Strict,
        )
        .unwrap();

        assert_eq!(tree.id.as_deref(), Some("machine"));
        assert_eq!(tree.description.as_deref(), Some("Root"));
        assert_eq!(tree.initial(), Some("a"));
        let states = tree.states().unwrap();
        assert_eq!(states["a"].key.as_deref(), Some("a"));
        assert_eq!(states["a"].tags, vec!["busy".to_string()]);
        assert_eq!(states["b"].kind(), StateKind::Parallel);
        assert_eq!(states["b"].states().unwrap().len(), 2);
    }

    #[test]
    fn strict_mode_fails_fast_with_path() {
        let error = resolve(
            &canonical(json!({
                "initial": "a",
                "states": {
                    "a": { "states": { "inner": { "exit": "doesNotExist" } }, "initial": "inner" }
                }
            })),
            &registry(),
            Strictness::Strict,
        )
        .unwrap_err();

        assert_eq!(
            error,
            ResolveError::UnresolvedReference {
                kind: ReferenceKind::Action,
                name: "doesNotExist".to_string(),
                path: "/a/inner".to_string(),
            }
        );
    }

    #[test]
    fn lenient_mode_reports_every_issue() {
        let config = canonical(json!({
            "entry": ["missing1", "record"],
            "on": { "GO": { "target": "/nowhere", "guards": "missing2" } }
        }));
        let options = CompileOptions::lenient();
        let resolution = resolve_with(&config, &registry(), &options).unwrap();

        let names: Vec<_> = resolution.issues.iter().map(ResolveError::name).collect();
        assert_eq!(names, vec!["missing1", "/nowhere", "missing2"]);
        assert!(resolution.tree.entry[0].is_placeholder());
        assert!(!resolution.tree.entry[1].is_placeholder());
    }

    #[test]
    fn root_errors_report_delimiter_path() {
        let error = resolve(
            &canonical(json!({ "entry": "missing" })),
            &registry(),
            Strictness::Strict,
        )
        .unwrap_err();
        assert_eq!(error.path(), "/");
    }

    #[test]
    fn resolved_tree_implements_state_tree() {
        let tree = resolve(
            &canonical(json!({ "initial": "a", "states": { "a": {}, "b": {} } })),
            &registry(),
            Strictness::Strict,
        )
        .unwrap();

        let flat = flatten(&tree, "/");
        assert_eq!(flat.len(), 3);
        assert!(flat["/"].states().unwrap().is_empty());
    }
}
