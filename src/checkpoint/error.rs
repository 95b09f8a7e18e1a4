//! Errors raised while saving or loading state value snapshots.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Encoding the snapshot as JSON or bincode failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Input was not a well-formed snapshot
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot was written with a different `CHECKPOINT_VERSION`
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
