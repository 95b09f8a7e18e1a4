//! Initial-state reduction.
//!
//! Two cooperating passes over any [`StateTree`]:
//! - [`initial_subtree`] prunes a tree down to the nodes active at startup
//! - [`initial_value`] turns that subtree into a [`StateValue`] snapshot
//!
//! A compound node keeps only the child named by its `initial`; a parallel
//! node keeps every region; an atomic node is a leaf. An `initial` that
//! names no child is always fatal, whatever strictness resolution used.

use crate::core::{child_path, display_path, StateKind, StateTree, StateValue};
use crate::options::DEFAULT_DELIMITER;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::trace;

/// Errors raised while computing the initial configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReduceError {
    /// A compound node's `initial` matches none of its children. `key` is
    /// empty when the node declares no `initial` at all.
    #[error("Initial state '{key}' is not defined at '{path}'")]
    UndefinedInitial { path: String, key: String },
}

/// Prune `node` to the subtree that is active at startup.
///
/// # Example
///
/// ```rust
/// use statetree::core::{normalize, StateNodeConfig};
/// use statetree::initial::initial_subtree;
///
/// let config: StateNodeConfig = serde_json::from_value(serde_json::json!({
///     "initial": "idle",
///     "states": { "idle": {}, "running": {} }
/// }))
/// .unwrap();
///
/// let subtree = initial_subtree(&normalize(&config)).unwrap();
/// let states = subtree.states().unwrap();
/// assert_eq!(states.len(), 1);
/// assert!(states.contains_key("idle"));
/// ```
pub fn initial_subtree<N: StateTree>(node: &N) -> Result<N, ReduceError> {
    initial_subtree_with(node, DEFAULT_DELIMITER)
}

/// [`initial_subtree`] with error paths rendered using `delimiter`.
pub fn initial_subtree_with<N: StateTree>(node: &N, delimiter: &str) -> Result<N, ReduceError> {
    reduce(node, delimiter, "")
}

fn reduce<N: StateTree>(node: &N, delimiter: &str, path: &str) -> Result<N, ReduceError> {
    trace!(path = %display_path(path, delimiter), kind = %node.kind(), "reducing to initial");

    match node.kind() {
        StateKind::Atomic => Ok(node.detached()),
        StateKind::Parallel => {
            let regions = node
                .children()
                .into_iter()
                .flatten()
                .map(|(key, child)| {
                    reduce(child, delimiter, &child_path(path, delimiter, key))
                        .map(|reduced| (key.clone(), reduced))
                })
                .collect::<Result<IndexMap<_, _>, _>>()?;
            Ok(node.with_children(regions))
        }
        StateKind::Compound => {
            let (key, child) = initial_child(node, delimiter, path)?;
            let reduced = reduce(child, delimiter, &child_path(path, delimiter, key))?;

            let mut kept = IndexMap::new();
            kept.insert(key.to_string(), reduced);
            Ok(node.with_children(kept))
        }
    }
}

fn initial_child<'n, N: StateTree>(
    node: &'n N,
    delimiter: &str,
    path: &str,
) -> Result<(&'n str, &'n N), ReduceError> {
    let undefined = |key: &str| ReduceError::UndefinedInitial {
        path: display_path(path, delimiter),
        key: key.to_string(),
    };

    // A missing `initial` never selects a child keyed "".
    let key = node.initial().ok_or_else(|| undefined(""))?;

    node.children()
        .and_then(|children| children.get_key_value(key))
        .map(|(key, child)| (key.as_str(), child))
        .ok_or_else(|| undefined(key))
}

/// Compute the initial [`StateValue`] of `node`.
///
/// A compound node whose initial child is atomic yields the bare child key;
/// otherwise the value nests one level per compound ancestor. A parallel
/// node yields one entry per region. A node that is atomic itself yields
/// the empty mapping.
///
/// # Example
///
/// ```rust
/// use statetree::core::{normalize, StateNodeConfig, StateValue};
/// use statetree::initial::initial_value;
///
/// let config: StateNodeConfig = serde_json::from_value(serde_json::json!({
///     "type": "parallel",
///     "states": {
///         "fast": { "initial": "on", "states": { "on": {}, "off": {} } },
///         "light": { "initial": "red", "states": { "red": {}, "green": {} } }
///     }
/// }))
/// .unwrap();
///
/// let value = initial_value(&normalize(&config)).unwrap();
/// assert_eq!(value.get("fast"), Some(&StateValue::leaf("on")));
/// assert_eq!(value.to_string(), "{fast: on, light: red}");
/// ```
pub fn initial_value<N: StateTree>(node: &N) -> Result<StateValue, ReduceError> {
    initial_value_with(node, DEFAULT_DELIMITER)
}

/// [`initial_value`] with error paths rendered using `delimiter`.
pub fn initial_value_with<N: StateTree>(node: &N, delimiter: &str) -> Result<StateValue, ReduceError> {
    let subtree = initial_subtree_with(node, delimiter)?;
    Ok(value_of(&subtree))
}

/// Value of an already-pruned subtree. Cannot fail: every compound node in
/// it keeps exactly its initial child.
fn value_of<N: StateTree>(node: &N) -> StateValue {
    let mut children = node.children().into_iter().flatten();

    match node.kind() {
        StateKind::Atomic => StateValue::empty(),
        StateKind::Parallel => children
            .map(|(key, child)| (key.clone(), value_of(child)))
            .collect(),
        StateKind::Compound => match children.next() {
            Some((key, child)) if child.kind().is_atomic() => StateValue::leaf(key.clone()),
            Some((key, child)) => std::iter::once((key.clone(), value_of(child))).collect(),
            None => StateValue::empty(),
        },
    }
}
