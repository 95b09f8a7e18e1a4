//! Statetree: compile hierarchical state machine configs.
//!
//! Statetree follows a "pure core, imperative shell" split. Everything here
//! is a pure tree transformation that runs once per machine definition;
//! executing transitions, scheduling delays and running promise effects is
//! left to the runtime engine that consumes the compiled output.
//!
//! # Pipeline
//!
//! - **Normalize**: authored [`StateNodeConfig`](crate::core::StateNodeConfig) →
//!   [`CanonicalStateNode`](crate::core::CanonicalStateNode), with each node's kind
//!   decided once
//! - **Resolve**: bind action, guard, promise and target references against a
//!   [`MachineOptions`](registry::MachineOptions) registry, strictly or
//!   leniently
//! - **Reduce**: prune to the active-at-startup subtree and compute its
//!   [`StateValue`](crate::core::StateValue)
//!
//! [`flatten`](crate::core::flatten) gives a path-addressed view of any tree at any
//! stage, and [`MachineDefinition`](machine::MachineDefinition) runs the
//! whole pipeline in one call.
//!
//! # Example
//!
//! ```rust
//! use statetree::core::{normalize, StateNodeConfig};
//! use statetree::initial::initial_value;
//! use statetree::registry::MachineOptions;
//! use statetree::resolve::resolve;
//! use statetree::Strictness;
//!
//! #[derive(Clone, Debug, Default)]
//! struct Lights {
//!     switches: u32,
//! }
//!
//! let config: StateNodeConfig = serde_json::from_value(serde_json::json!({
//!     "type": "parallel",
//!     "states": {
//!         "fast": { "initial": "on", "states": { "on": {}, "off": {} } },
//!         "light": {
//!             "initial": "red",
//!             "states": {
//!                 "red": { "on": { "NEXT": { "target": "green", "actions": "count" } } },
//!                 "green": {}
//!             }
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! let registry: MachineOptions<Lights, ()> = MachineOptions::new()
//!     .with_action("count", |l: &Lights, _: &()| Lights { switches: l.switches + 1 });
//!
//! let canonical = normalize(&config);
//! let resolved = resolve(&canonical, &registry, Strictness::Strict).unwrap();
//! let value = initial_value(&resolved).unwrap();
//!
//! assert_eq!(value.to_string(), "{fast: on, light: red}");
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod initial;
pub mod machine;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod validate;

// Re-export commonly used types
pub use crate::core::{
    flatten, normalize, CanonicalStateNode, StateKind, StateNodeConfig, StateValue,
};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use initial::{initial_subtree, initial_value, ReduceError};
pub use machine::{MachineDefinition, MachineError};
pub use options::{CompileOptions, Strictness, DEFAULT_DELIMITER};
pub use registry::MachineOptions;
pub use resolve::{resolve, resolve_with, ResolveError, ResolvedStateNode};
pub use validate::{validate, ConfigIssue};
