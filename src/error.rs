//! Crate-wide error types

use thiserror::Error;

/// Errors surfaced by the recommendation core
#[derive(Debug, Error)]
pub enum Error {
    /// The inference context is missing models or the encoder
    #[error("ensemble not ready: {0}")]
    NotReady(String),

    /// An expected artifact file was absent during load
    #[error("missing artifact: {0}")]
    MissingArtifact(String),

    /// An artifact file failed its manifest digest check
    #[error("corrupted artifact: {0}")]
    ArtifactCorrupted(String),

    /// Training was invoked on an empty corpus
    #[error("training corpus is empty")]
    CorpusEmpty,

    /// A corpus row could not be parsed
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// An inference input field could not be interpreted
    #[error("invalid input field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Artifact serialization or deserialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for all core operations
pub type Result<T> = std::result::Result<T, Error>;
