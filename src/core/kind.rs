//! State node kinds and the classifier that assigns them.
//!
//! Every node in a state tree is exactly one of three kinds. The kind is
//! either declared explicitly by the author or inferred from the node's
//! shape. `Parallel` can only ever be declared, never inferred.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a state node.
///
/// # Example
///
/// ```rust
/// use statetree::core::StateKind;
///
/// assert!(StateKind::Compound.is_compound());
/// assert_eq!(StateKind::Parallel.as_str(), "parallel");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateKind {
    /// Leaf node, no children.
    Atomic,
    /// Exactly one child active at a time, chosen by `initial` at startup.
    Compound,
    /// Every child (region) active at the same time.
    Parallel,
}

impl StateKind {
    /// Classify a node from its explicit declaration and its child count.
    ///
    /// An explicit kind always wins. Otherwise a node with at least one
    /// child is compound and anything else is atomic.
    pub fn classify(explicit: Option<StateKind>, child_count: usize) -> StateKind {
        match explicit {
            Some(kind) => kind,
            None if child_count > 0 => StateKind::Compound,
            None => StateKind::Atomic,
        }
    }

    /// Returns true for a leaf node.
    pub fn is_atomic(self) -> bool {
        matches!(self, Self::Atomic)
    }

    /// Returns true for a node with one active child.
    pub fn is_compound(self) -> bool {
        matches!(self, Self::Compound)
    }

    /// Returns true for a node whose regions are all active.
    pub fn is_parallel(self) -> bool {
        matches!(self, Self::Parallel)
    }

    /// Lowercase name, as written in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Compound => "compound",
            Self::Parallel => "parallel",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
