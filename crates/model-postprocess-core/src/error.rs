//! Error types for model post-processing.
//!
//! The passes themselves are total. Errors only come from the surfaces around
//! them: option resolution, the opt-in consistency check, and JSON I/O.

use thiserror::Error;

use crate::check::Inconsistency;

#[derive(Debug, Error)]
pub enum PostProcessError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown serialization library: {name}")]
    UnknownSerializationLibrary { name: String },

    #[error("Schema inconsistency: {0}")]
    SchemaInconsistency(Inconsistency),
}
