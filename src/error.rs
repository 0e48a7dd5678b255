//! Error types for the `ragpipe` crate.

use thiserror::Error;

/// Errors that can occur while building or querying the pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// A source record was malformed (bad JSON, missing or empty fields).
    ///
    /// Build policy: skip the record, keep going, count it in the
    /// [`BuildReport`](crate::document::BuildReport).
    #[error("Parse error: {0}")]
    Parse(String),

    /// A configuration validation error. Fatal for the current operation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An embedding's dimension disagrees with the index's dimension.
    ///
    /// Indicates an embedder swap without a full rebuild, which is
    /// disallowed.
    #[error("Dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimension the index was created with.
        expected: usize,
        /// The dimension of the offending vector.
        actual: usize,
    },

    /// The embedding capability failed.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The generation capability failed.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generator that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A search id fell outside the metadata store.
    ///
    /// Search ids are bounded by store length by construction, so this
    /// indicates a programming or corruption bug. Always fatal.
    #[error("Chunk id {id} out of range (store holds {len} chunks)")]
    OutOfRange {
        /// The requested chunk id.
        id: usize,
        /// The number of chunks in the store.
        len: usize,
    },

    /// A caller-supplied argument was invalid (e.g. `k <= 0`).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or writing a file (persisted artifact or source) failed.
    #[error("Persistence error ({path}): {message}")]
    Persist {
        /// The artifact path involved.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
