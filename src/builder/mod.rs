//! Builder API for ergonomic config construction.
//!
//! This module provides fluent constructors on [`StateNodeConfig`] and
//! builders for transitions and promises, producing the same configs a
//! user would otherwise write as JSON.
//!
//! # Example
//!
//! ```
//! use statetree::builder::guarded_transition;
//! use statetree::core::StateNodeConfig;
//! use statetree::initial::initial_value;
//!
//! let machine = StateNodeConfig::compound("idle")
//!     .state("idle", StateNodeConfig::atomic().on("START", guarded_transition("running", "ready")))
//!     .state("running", StateNodeConfig::atomic());
//!
//! assert_eq!(initial_value(&machine).unwrap().as_leaf(), Some("idle"));
//! ```
//!
//! [`StateNodeConfig`]: crate::core::StateNodeConfig

pub mod error;
pub mod promise;
pub mod state;
pub mod transition;

pub use error::BuildError;
pub use promise::PromiseBuilder;
pub use transition::TransitionBuilder;

use crate::core::{GuardConfig, OneOrMany, TransitionConfig, TransitionDetail};

/// Create an unconditional transition to `target`.
pub fn simple_transition(target: impl Into<String>) -> TransitionConfig {
    TransitionConfig::Target(target.into())
}

/// Create a transition to `target` enabled only when `guard` passes.
pub fn guarded_transition(
    target: impl Into<String>,
    guard: impl Into<GuardConfig>,
) -> TransitionConfig {
    TransitionConfig::Detailed(TransitionDetail {
        target: Some(target.into()),
        guards: OneOrMany::One(guard.into()),
        ..TransitionDetail::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_transition_is_bare_target() {
        assert_eq!(simple_transition("/done"), TransitionConfig::Target("/done".into()));
    }

    #[test]
    fn guarded_transition_carries_guard() {
        let detail = guarded_transition("/done", "ready").to_detail();

        assert_eq!(detail.target.as_deref(), Some("/done"));
        assert_eq!(detail.guards.as_slice(), [GuardConfig::Named("ready".into())]);
        assert!(detail.actions.is_empty());
    }
}
