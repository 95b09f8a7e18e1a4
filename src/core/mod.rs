//! Core state tree types and the pure passes over them.
//!
//! This module contains everything that does not need a capability
//! registry:
//! - Node kinds and their classifier
//! - Authored configs and their canonical (normalized) form
//! - Path flattening and structural views over any tree
//! - State values
//!
//! All logic in this module is pure. Every pass returns a freshly owned
//! tree and never mutates its input.

mod canonical;
mod config;
mod kind;
mod tree;
mod value;

pub use canonical::{normalize, CanonicalStateNode, StateNodeKind};
pub use config::{
    ActionConfig, ActionDescriptor, FinallyConfig, FinallyDetail, GuardConfig, OneOrMany,
    PromiseConfig, StateNodeConfig, TransitionConfig, TransitionDetail, TransitionMap,
};
pub use kind::StateKind;
pub use tree::{flatten, flatten_at, to_state_map, FlatStateMap, StateMap, StateTree};
pub use value::StateValue;

pub(crate) use tree::{child_path, display_path};
