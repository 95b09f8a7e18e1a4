//! Resolution errors.

use std::fmt;
use thiserror::Error;

/// What kind of symbol a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Action,
    Guard,
    Promise,
    /// A transition target or `in` state path.
    Target,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Action => "action",
            Self::Guard => "guard",
            Self::Promise => "promise",
            Self::Target => "target",
        })
    }
}

/// Errors that can occur while binding a canonical tree to a registry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error("Unresolved {kind} reference '{name}' at '{path}'")]
    UnresolvedReference {
        kind: ReferenceKind,
        name: String,
        path: String,
    },
}

impl ResolveError {
    /// The offending reference name.
    pub fn name(&self) -> &str {
        match self {
            Self::UnresolvedReference { name, .. } => name,
        }
    }

    /// Path of the node that owns the reference.
    pub fn path(&self) -> &str {
        match self {
            Self::UnresolvedReference { path, .. } => path,
        }
    }
}
