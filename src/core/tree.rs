//! Read-only views over any state tree: path flattening and kind skeletons.
//!
//! Authored, canonical and resolved trees all implement [`StateTree`], so
//! the flattener and the initial-state reducer work on each of them.

use super::canonical::CanonicalStateNode;
use super::config::StateNodeConfig;
use super::kind::StateKind;
use indexmap::IndexMap;
use serde::Serialize;

/// Mapping from a node's path to its own fields (children excluded).
pub type FlatStateMap<N> = IndexMap<String, N>;

/// A recursive tree of state nodes keyed by child identifier.
pub trait StateTree: Sized {
    fn kind(&self) -> StateKind;

    /// Key of the default child, if one is declared.
    fn initial(&self) -> Option<&str>;

    fn children(&self) -> Option<&IndexMap<String, Self>>;

    /// Copy of this node's own fields with its children replaced.
    fn with_children(&self, children: IndexMap<String, Self>) -> Self;

    /// Copy of this node's own fields without any children.
    fn detached(&self) -> Self {
        self.with_children(IndexMap::new())
    }
}

impl StateTree for StateNodeConfig {
    fn kind(&self) -> StateKind {
        StateNodeConfig::kind(self)
    }

    fn initial(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    fn children(&self) -> Option<&IndexMap<String, Self>> {
        self.states.as_ref()
    }

    fn with_children(&self, children: IndexMap<String, Self>) -> Self {
        Self {
            states: Some(children),
            ..self.detached()
        }
    }

    // The kind is pinned so a childless copy of an inferred compound
    // node still reports `Compound`.
    fn detached(&self) -> Self {
        Self {
            r#type: Some(self.kind()),
            id: self.id.clone(),
            description: self.description.clone(),
            initial: self.initial.clone(),
            entry: self.entry.clone(),
            exit: self.exit.clone(),
            tags: self.tags.clone(),
            on: self.on.clone(),
            after: self.after.clone(),
            always: self.always.clone(),
            promises: self.promises.clone(),
            states: None,
        }
    }
}

impl StateTree for CanonicalStateNode {
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

/// Display form of an internal path: the root is the delimiter itself.
pub(crate) fn display_path(path: &str, delimiter: &str) -> String {
    if path.is_empty() {
        delimiter.to_string()
    } else {
        path.to_string()
    }
}

pub(crate) fn child_path(path: &str, delimiter: &str, key: &str) -> String {
    format!("{path}{delimiter}{key}")
}

/// Flatten a tree into a path-addressed map, starting from the root.
///
/// # Example
///
/// ```rust
/// use statetree::core::{flatten, StateNodeConfig};
///
/// let config: StateNodeConfig = serde_json::from_value(serde_json::json!({
///     "initial": "idle",
///     "states": {
///         "idle": { "on": { "START": "/running" } },
///         "running": { "states": { "fast": {}, "slow": {} } }
///     }
/// }))
/// .unwrap();
///
/// let flat = flatten(&config, "/");
/// let paths: Vec<_> = flat.keys().map(String::as_str).collect();
/// assert_eq!(
///     paths,
///     ["/", "/idle", "/running", "/running/fast", "/running/slow"]
/// );
/// assert!(flat["/running"].states.is_none());
/// ```
pub fn flatten<N: StateTree>(node: &N, delimiter: &str) -> FlatStateMap<N> {
    flatten_at(node, delimiter, "")
}

/// Flatten a tree whose root sits at `base_path`.
///
/// An empty `base_path` denotes the root, which is keyed by the delimiter.
/// Entries appear in depth-first, declaration order. Raw entries carry their
/// kind as an explicit `type`, since their `states` are stripped.
pub fn flatten_at<N: StateTree>(node: &N, delimiter: &str, base_path: &str) -> FlatStateMap<N> {
    let mut out = IndexMap::new();
    flatten_into(node, delimiter, base_path, &mut out);
    out
}

fn flatten_into<N: StateTree>(
    node: &N,
    delimiter: &str,
    path: &str,
    out: &mut FlatStateMap<N>,
) {
    out.entry(display_path(path, delimiter))
        .or_insert_with(|| node.detached());

    for (key, child) in node.children().into_iter().flatten() {
        flatten_into(child, delimiter, &child_path(path, delimiter, key), out);
    }
}

/// Structural skeleton of a tree: the kind of every node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateMap {
    #[serde(rename = "type")]
    pub kind: StateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<IndexMap<String, StateMap>>,
}

/// Reduce a tree to its kind skeleton. Nodes without children carry no
/// `states` entry.
pub fn to_state_map<N: StateTree>(node: &N) -> StateMap {
    let states = node
        .children()
        .filter(|children| !children.is_empty())
        .map(|children| {
            children
                .iter()
                .map(|(key, child)| (key.clone(), to_state_map(child)))
                .collect()
        });

    StateMap {
        kind: node.kind(),
        states,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize;
    use serde_json::json;

    fn sample() -> StateNodeConfig {
        serde_json::from_value(json!({
            "initial": "idle",
            "entry": "boot",
            "states": {
                "idle": { "on": { "START": "/running" } },
                "running": {
                    "type": "parallel",
                    "states": {
                        "engine": { "initial": "on", "states": { "on": {}, "off": {} } },
                        "radio": {}
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn flatten_has_one_entry_per_node() {
        let flat = flatten(&sample(), "/");
        assert_eq!(flat.len(), 7);
    }

    #[test]
    fn flatten_builds_paths_depth_first() {
        let flat = flatten(&sample(), "/");
        let paths: Vec<_> = flat.keys().cloned().collect();
        assert_eq!(
            paths,
            vec![
                "/",
                "/idle",
                "/running",
                "/running/engine",
                "/running/engine/on",
                "/running/engine/off",
                "/running/radio",
            ]
        );
    }

    #[test]
    fn flatten_follows_declaration_order_not_key_order() {
        let config: StateNodeConfig = serde_json::from_value(json!({
            "initial": "b",
            "states": { "b": {}, "a": { "states": { "z": {}, "y": {} } } }
        }))
        .unwrap();
        let paths: Vec<_> = flatten(&config, "/").into_keys().collect();

        assert_eq!(paths, vec!["/", "/b", "/a", "/a/z", "/a/y"]);
    }

    #[test]
    fn raw_entries_keep_inferred_kind() {
        let flat = flatten(&sample(), "/");

        assert_eq!(flat["/"].kind(), StateKind::Compound);
        assert_eq!(flat["/running/engine"].kind(), StateKind::Compound);
        assert_eq!(flat["/running"].kind(), StateKind::Parallel);
        assert_eq!(flat["/idle"].kind(), StateKind::Atomic);
    }

    #[test]
    fn flatten_honors_custom_delimiter() {
        let flat = flatten(&sample(), ".");
        assert!(flat.contains_key("."));
        assert!(flat.contains_key(".running.engine.off"));
    }

    #[test]
    fn flatten_strips_children_but_keeps_own_fields() {
        let flat = flatten(&sample(), "/");
        let root = &flat["/"];

        assert!(root.states.is_none());
        assert_eq!(root.initial.as_deref(), Some("idle"));
        assert_eq!(root.entry.len(), 1);
        assert!(flat["/idle"].on.contains_key("START"));
    }

    #[test]
    fn flatten_at_uses_base_path() {
        let config = sample();
        let running = &config.states.as_ref().unwrap()["running"];
        let flat = flatten_at(running, "/", "/running");

        assert!(flat.contains_key("/running"));
        assert!(flat.contains_key("/running/engine/on"));
        assert_eq!(flat.len(), 5);
    }

    #[test]
    fn flatten_canonical_tree_keeps_kind() {
        let canonical = normalize(&sample());
        let flat = flatten(&canonical, "/");

        assert_eq!(flat["/running"].kind(), StateKind::Parallel);
        assert!(flat["/running"].states().unwrap().is_empty());
        assert_eq!(flat["/running/engine"].initial(), Some("on"));
        assert_eq!(flat["/running/engine"].key.as_deref(), Some("engine"));
    }

    #[test]
    fn state_map_mirrors_structure() {
        let map = to_state_map(&normalize(&sample()));

        assert_eq!(map.kind, StateKind::Compound);
        let states = map.states.as_ref().unwrap();
        assert_eq!(states["idle"].kind, StateKind::Atomic);
        assert!(states["idle"].states.is_none());
        assert_eq!(states["running"].kind, StateKind::Parallel);
        assert_eq!(
            states["running"].states.as_ref().unwrap()["engine"].kind,
            StateKind::Compound
        );
    }

    #[test]
    fn state_map_serializes_types() {
        let map = to_state_map(&sample());
        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value["type"], "compound");
        assert_eq!(value["states"]["running"]["type"], "parallel");
        assert!(value["states"]["idle"].get("states").is_none());
    }
}
