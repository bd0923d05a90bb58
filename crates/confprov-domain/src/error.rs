//! Error types for provenance decoding

use thiserror::Error;

/// Result type alias for provenance operations.
pub type Result<T> = std::result::Result<T, ProvenanceError>;

/// Errors raised while decoding persisted provenance.
///
/// Recording and querying never fail; only reading a serialized leaf can.
#[derive(Debug, Error)]
pub enum ProvenanceError {
    /// A serialized leaf lacks a required key
    #[error("Missing required provenance key: {0}")]
    MissingKey(&'static str),

    /// A serialized leaf is not a mapping at all
    #[error("Provenance entry must be a mapping, found {0}")]
    NotAMapping(&'static str),
}
