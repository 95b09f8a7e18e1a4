//! Build errors for config builders.

use thiserror::Error;

/// Errors that can occur when building transitions and promises.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Transition has neither a target nor actions. Call .target(path) or .action(name)")]
    EmptyTransition,

    #[error("Promise source not specified. Call .src(name) before .build()")]
    MissingSource,

    #[error("Promise has no `then` transition. Call .then(transition)")]
    MissingThen,

    #[error("Promise has no `catch` transition. Call .catch(transition)")]
    MissingCatch,
}
