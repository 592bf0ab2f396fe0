//! Error types for query sessions.

use std::{io, path::PathBuf};

use pubq_query::{GrammarError, IncompleteQuery, IndexError};
use thiserror::Error;

/// Errors reported by a [`Session`](crate::Session) or while loading and saving records.
///
/// None of these leave the session in a changed state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Query text failed grammar validation.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// A group index was out of range.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The query is not ready to hand off.
    #[error("query is incomplete: {0}")]
    Incomplete(#[from] IncompleteQuery),

    /// An external service call failed.
    #[error("generation service failed: {message}")]
    Collaborator {
        /// Description of the failure, as reported by the caller.
        message: String,
    },

    /// The generation service answered with something that is not a synonym list.
    #[error("malformed synonym response: {0}")]
    SynonymResponse(#[source] serde_json::Error),

    /// A synonym was toggled that is not among the group's suggestions.
    #[error("'{synonym}' is not a suggested synonym for group {index}")]
    UnknownSynonym {
        /// Zero-based group index.
        index: usize,
        /// The synonym that was requested.
        synonym: String,
    },

    /// Failed to read a record file.
    #[error("failed to read record {path}: {source}")]
    ReadRecord {
        /// Path to the record.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write a record file.
    #[error("failed to write record {path}: {source}")]
    WriteRecord {
        /// Path to the record.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A record could not be rendered as JSON.
    #[error("failed to serialize record: {0}")]
    SerializeRecord(#[source] serde_json::Error),

    /// A record file is not valid JSON of the expected shape.
    #[error("failed to parse record {path}: {source}")]
    ParseRecord {
        /// Path to the record.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
