//! Canonical state nodes and the normalizer that produces them.
//!
//! A canonical node has its kind decided once, stored as a tagged variant,
//! so downstream passes match on it instead of re-inferring. Lists are
//! always lists, and every child carries its own key.

use super::config::{
    ActionConfig, ActionDescriptor, PromiseConfig, StateNodeConfig, TransitionConfig, TransitionMap,
};
use super::kind::StateKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Kind of a node together with the data only that kind may carry.
///
/// Generic over the child node type so the canonical and resolved trees
/// share the same shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StateNodeKind<N> {
    Atomic,
    Compound {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial: Option<String>,
        states: IndexMap<String, N>,
    },
    Parallel {
        states: IndexMap<String, N>,
    },
}

impl<N> StateNodeKind<N> {
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Atomic => StateKind::Atomic,
            Self::Compound { .. } => StateKind::Compound,
            Self::Parallel { .. } => StateKind::Parallel,
        }
    }

    pub fn initial(&self) -> Option<&str> {
        match self {
            Self::Compound { initial, .. } => initial.as_deref(),
            _ => None,
        }
    }

    pub fn states(&self) -> Option<&IndexMap<String, N>> {
        match self {
            Self::Atomic => None,
            Self::Compound { states, .. } | Self::Parallel { states } => Some(states),
        }
    }

    /// Same kind and `initial`, different children.
    pub fn with_states<M>(&self, states: IndexMap<String, M>) -> StateNodeKind<M> {
        match self {
            Self::Atomic => StateNodeKind::Atomic,
            Self::Compound { initial, .. } => StateNodeKind::Compound {
                initial: initial.clone(),
                states,
            },
            Self::Parallel { .. } => StateNodeKind::Parallel { states },
        }
    }
}

/// Normalized counterpart of [`StateNodeConfig`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalStateNode {
    /// Key of this node under its parent. `None` only for the root.
    #[serde(rename = "__id", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub body: StateNodeKind<CanonicalStateNode>,
    pub entry: Vec<ActionDescriptor>,
    pub exit: Vec<ActionDescriptor>,
    pub tags: Vec<String>,
    #[serde(default)]
    pub on: IndexMap<String, Vec<TransitionConfig>>,
    #[serde(default)]
    pub after: IndexMap<String, Vec<TransitionConfig>>,
    #[serde(default)]
    pub always: Vec<TransitionConfig>,
    #[serde(default)]
    pub promises: Vec<PromiseConfig>,
}

impl CanonicalStateNode {
    pub fn kind(&self) -> StateKind {
        self.body.kind()
    }

    pub fn initial(&self) -> Option<&str> {
        self.body.initial()
    }

    pub fn states(&self) -> Option<&IndexMap<String, CanonicalStateNode>> {
        self.body.states()
    }

    /// Lift back into the authored shape, with every field explicit.
    pub fn to_config(&self) -> StateNodeConfig {
        StateNodeConfig {
            r#type: Some(self.kind()),
            id: self.id.clone(),
            description: self.description.clone(),
            initial: self.initial().map(str::to_string),
            entry: self.entry.iter().cloned().map(ActionConfig::Described).collect(),
            exit: self.exit.iter().cloned().map(ActionConfig::Described).collect(),
            tags: self.tags.iter().cloned().collect(),
            on: lift_transition_map(&self.on),
            after: lift_transition_map(&self.after),
            always: self.always.clone().into_iter().collect(),
            promises: self.promises.clone().into_iter().collect(),
            states: self.states().map(|states| {
                states
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_config()))
                    .collect()
            }),
        }
    }
}

fn lift_transition_map(map: &IndexMap<String, Vec<TransitionConfig>>) -> TransitionMap {
    map.iter()
        .map(|(key, transitions)| (key.clone(), transitions.clone().into_iter().collect()))
        .collect()
}

/// Lower an authored config into its canonical form.
///
/// Recursive, pre-order. Never fails: fields that contradict the node's
/// kind (an `initial` outside a compound node, children under an explicit
/// atomic node) are dropped with a warning.
///
/// # Example
///
/// ```rust
/// use statetree::core::{normalize, StateKind, StateNodeConfig};
///
/// let config: StateNodeConfig = serde_json::from_value(serde_json::json!({
///     "initial": "idle",
///     "entry": "boot",
///     "states": { "idle": { "tags": "waiting" } }
/// }))
/// .unwrap();
///
/// let canonical = normalize(&config);
/// assert_eq!(canonical.kind(), StateKind::Compound);
/// assert_eq!(canonical.entry[0].name, "boot");
///
/// let idle = &canonical.states().unwrap()["idle"];
/// assert_eq!(idle.key.as_deref(), Some("idle"));
/// assert_eq!(idle.tags, vec!["waiting".to_string()]);
/// ```
pub fn normalize(config: &StateNodeConfig) -> CanonicalStateNode {
    debug!("normalizing state configuration");
    let canonical = normalize_node(config, None);
    debug!(kind = %canonical.kind(), "normalized state configuration");
    canonical
}

fn normalize_node(config: &StateNodeConfig, key: Option<&str>) -> CanonicalStateNode {
    let kind = config.kind();
    trace!(key = key.unwrap_or_default(), %kind, "normalizing state node");

    let children = || -> IndexMap<String, CanonicalStateNode> {
        config
            .states
            .iter()
            .flatten()
            .map(|(child_key, child)| (child_key.clone(), normalize_node(child, Some(child_key))))
            .collect()
    };

    if config.initial.is_some() && !kind.is_compound() {
        warn!(
            key = key.unwrap_or_default(),
            %kind,
            "dropping `initial` declared on a non-compound state"
        );
    }

    let body = match kind {
        StateKind::Atomic => {
            if config.states.as_ref().is_some_and(|states| !states.is_empty()) {
                warn!(
                    key = key.unwrap_or_default(),
                    "dropping children of a state declared atomic"
                );
            }
            StateNodeKind::Atomic
        }
        StateKind::Compound => StateNodeKind::Compound {
            initial: config.initial.clone(),
            states: children(),
        },
        StateKind::Parallel => StateNodeKind::Parallel { states: children() },
    };

    CanonicalStateNode {
        key: key.map(str::to_string),
        id: config.id.clone(),
        description: config.description.clone(),
        body,
        entry: config.entry.iter().map(|action| action.to_descriptor()).collect(),
        exit: config.exit.iter().map(|action| action.to_descriptor()).collect(),
        tags: config.tags.as_slice().to_vec(),
        on: normalize_transition_map(&config.on),
        after: normalize_transition_map(&config.after),
        always: config.always.as_slice().to_vec(),
        promises: config.promises.as_slice().to_vec(),
    }
}

fn normalize_transition_map(map: &TransitionMap) -> IndexMap<String, Vec<TransitionConfig>> {
    map.iter()
        .map(|(key, transitions)| (key.clone(), transitions.as_slice().to_vec()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> StateNodeConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalize_coerces_lists() {
        let canonical = normalize(&config(json!({
            "entry": "a",
            "exit": ["b", { "name": "c", "description": "Cleanup" }],
            "tags": "busy"
        })));

        assert_eq!(canonical.kind(), StateKind::Atomic);
        assert_eq!(canonical.entry, vec![ActionDescriptor::named("a")]);
        assert_eq!(canonical.exit.len(), 2);
        assert_eq!(canonical.exit[1].description.as_deref(), Some("Cleanup"));
        assert_eq!(canonical.tags, vec!["busy".to_string()]);
    }

    #[test]
    fn normalize_injects_child_keys_in_order() {
        let canonical = normalize(&config(json!({
            "initial": "b",
            "states": { "b": {}, "a": { "initial": "x", "states": { "x": {} } } }
        })));

        assert!(canonical.key.is_none());
        let states = canonical.states().unwrap();
        let keys: Vec<_> = states.keys().cloned().collect();
        assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(states["a"].key.as_deref(), Some("a"));
        assert_eq!(states["a"].states().unwrap()["x"].key.as_deref(), Some("x"));
    }

    #[test]
    fn normalize_keeps_absent_initial_absent() {
        let canonical = normalize(&config(json!({ "states": { "a": {} } })));
        assert_eq!(canonical.kind(), StateKind::Compound);
        assert_eq!(canonical.initial(), None);

        let empty = normalize(&config(json!({ "initial": "", "states": { "a": {} } })));
        assert_eq!(empty.initial(), Some(""));
    }

    #[test]
    fn normalize_preserves_metadata() {
        let canonical = normalize(&config(json!({
            "id": "machine",
            "description": "Traffic light"
        })));

        assert_eq!(canonical.id.as_deref(), Some("machine"));
        assert_eq!(canonical.description.as_deref(), Some("Traffic light"));
    }

    #[test]
    fn normalize_drops_initial_on_parallel() {
        let canonical = normalize(&config(json!({
            "type": "parallel",
            "initial": "a",
            "states": { "a": {}, "b": {} }
        })));

        assert_eq!(canonical.kind(), StateKind::Parallel);
        assert_eq!(canonical.initial(), None);
        assert_eq!(canonical.states().unwrap().len(), 2);
    }

    #[test]
    fn normalize_keeps_transitions() {
        let canonical = normalize(&config(json!({
            "on": { "NEXT": "/b", "BACK": ["/a", { "target": "/c", "guards": "g" }] },
            "after": { "DELAY": "/b" },
            "always": "/c",
            "promises": { "src": "p", "then": "/a", "catch": "/b" }
        })));

        assert_eq!(canonical.on["NEXT"].len(), 1);
        assert_eq!(canonical.on["BACK"].len(), 2);
        assert_eq!(canonical.after["DELAY"].len(), 1);
        assert_eq!(canonical.always, vec![TransitionConfig::Target("/c".into())]);
        assert_eq!(canonical.promises[0].src, "p");
    }

    #[test]
    fn normalize_is_idempotent_through_to_config() {
        let original = config(json!({
            "initial": "a",
            "entry": ["x"],
            "states": {
                "a": { "type": "parallel", "states": { "p": {}, "q": { "tags": ["t"] } } },
                "b": {}
            }
        }));

        let once = normalize(&original);
        let twice = normalize(&once.to_config());
        assert_eq!(once, twice);
    }

    #[test]
    fn canonical_serializes_type_and_id() {
        let canonical = normalize(&config(json!({
            "initial": "a",
            "states": { "a": {} }
        })));
        let value = serde_json::to_value(&canonical).unwrap();

        assert_eq!(value["type"], "compound");
        assert_eq!(value["initial"], "a");
        assert_eq!(value["states"]["a"]["__id"], "a");
        assert_eq!(value["states"]["a"]["type"], "atomic");
    }
}
