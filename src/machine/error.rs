//! Errors surfaced by the one-shot compile API.

use crate::checkpoint::CheckpointError;
use crate::initial::ReduceError;
use crate::resolve::ResolveError;
use thiserror::Error;

/// Anything that can stop a machine from compiling or resuming.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Reduce(#[from] ReduceError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// A restored state value names a path the machine does not have.
    #[error("Checkpoint references unknown state '{path}'")]
    UnknownState { path: String },
}
