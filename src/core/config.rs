//! Author-facing state machine configuration.
//!
//! These types mirror what a user writes by hand (or in JSON): most
//! list-valued fields accept either a single value or an array, the node
//! kind is optional, and nothing has been checked yet. The normalizer turns
//! a [`StateNodeConfig`] into a canonical tree.

use super::kind::StateKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A value that may be written either alone or as a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// True only for an empty list; a single value is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(items) => items.is_empty(),
        }
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// View the values as a slice, in authored order.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items.as_slice(),
        }
    }

    /// Iterate over the values in authored order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Append a value, promoting a single value to a list.
    pub fn push(&mut self, value: T) {
        match std::mem::take(self) {
            Self::One(first) => *self = Self::Many(vec![first, value]),
            Self::Many(mut items) => {
                items.push(value);
                *self = Self::Many(items);
            }
        }
    }

    /// Consume into a list, wrapping a single value.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> FromIterator<T> for OneOrMany<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Many(iter.into_iter().collect())
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        Self::One(value)
    }
}

/// A named action with optional human-readable metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ActionDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Reference to an action, either a bare name or a full descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionConfig {
    Named(String),
    Described(ActionDescriptor),
}

impl ActionConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Described(descriptor) => &descriptor.name,
        }
    }

    /// Lower to a descriptor; bare names get no description.
    pub fn to_descriptor(&self) -> ActionDescriptor {
        match self {
            Self::Named(name) => ActionDescriptor::named(name.clone()),
            Self::Described(descriptor) => descriptor.clone(),
        }
    }
}

impl From<&str> for ActionConfig {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<ActionDescriptor> for ActionConfig {
    fn from(descriptor: ActionDescriptor) -> Self {
        Self::Described(descriptor)
    }
}

/// Reference to a guard: a name, or a boolean combination of guards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GuardConfig {
    Named(String),
    And { and: Vec<GuardConfig> },
    Or { or: Vec<GuardConfig> },
}

impl From<&str> for GuardConfig {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

/// Full form of a transition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub guards: OneOrMany<GuardConfig>,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub actions: OneOrMany<ActionConfig>,
    /// State paths that must be active for the transition to be enabled.
    #[serde(rename = "in", default, skip_serializing_if = "OneOrMany::is_empty")]
    pub in_states: OneOrMany<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A transition: either a bare target path or a full descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionConfig {
    Target(String),
    Detailed(TransitionDetail),
}

impl TransitionConfig {
    /// View any transition in its full form.
    pub fn to_detail(&self) -> TransitionDetail {
        match self {
            Self::Target(target) => TransitionDetail {
                target: Some(target.clone()),
                ..TransitionDetail::default()
            },
            Self::Detailed(detail) => detail.clone(),
        }
    }
}

impl From<&str> for TransitionConfig {
    fn from(target: &str) -> Self {
        Self::Target(target.to_string())
    }
}

impl From<TransitionDetail> for TransitionConfig {
    fn from(detail: TransitionDetail) -> Self {
        Self::Detailed(detail)
    }
}

/// Full form of a promise `finally` clause.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinallyDetail {
    pub actions: OneOrMany<ActionConfig>,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub guards: OneOrMany<GuardConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Clause run once a promise settles, whatever the outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FinallyConfig {
    Action(String),
    Detailed(FinallyDetail),
}

impl From<&str> for FinallyConfig {
    fn from(action: &str) -> Self {
        Self::Action(action.to_string())
    }
}

impl From<FinallyDetail> for FinallyConfig {
    fn from(detail: FinallyDetail) -> Self {
        Self::Detailed(detail)
    }
}

/// A promise-typed transition set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromiseConfig {
    /// Name of the promise handler in the registry.
    pub src: String,
    pub then: OneOrMany<TransitionConfig>,
    pub catch: OneOrMany<TransitionConfig>,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub finally: OneOrMany<FinallyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Transitions keyed by event name or delay name.
pub type TransitionMap = IndexMap<String, OneOrMany<TransitionConfig>>;

/// A state node as authored.
///
/// # Example
///
/// ```rust
/// use statetree::core::{StateKind, StateNodeConfig};
///
/// let config: StateNodeConfig = serde_json::from_value(serde_json::json!({
///     "initial": "idle",
///     "states": {
///         "idle": { "on": { "START": "/running" } },
///         "running": {}
///     }
/// }))
/// .unwrap();
///
/// assert_eq!(config.kind(), StateKind::Compound);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateNodeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<StateKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub entry: OneOrMany<ActionConfig>,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub exit: OneOrMany<ActionConfig>,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub tags: OneOrMany<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub on: TransitionMap,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub after: TransitionMap,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub always: OneOrMany<TransitionConfig>,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub promises: OneOrMany<PromiseConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<IndexMap<String, StateNodeConfig>>,
}

impl StateNodeConfig {
    /// Declared kind, or the kind inferred from the node's children.
    pub fn kind(&self) -> StateKind {
        StateKind::classify(self.r#type, self.states.as_ref().map_or(0, IndexMap::len))
    }
}
