//! Error types for tirea-mapper operations.
//!
//! Mapping itself is total: reading a missing path yields absence and writing
//! creates whatever structure is needed. Errors only arise while building the
//! inputs of a mapper, i.e. parsing paths and loading rename configuration.

use thiserror::Error;

/// Result type alias for tirea-mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors that can occur while constructing paths, rename tables and mappers.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A path string could not be parsed.
    #[error("invalid path {input:?} at offset {offset}: {reason}")]
    InvalidPath {
        /// The path string as given.
        input: String,
        /// Byte offset where parsing failed.
        offset: usize,
        /// What the parser expected.
        reason: &'static str,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MapperError {
    /// Create an invalid path error.
    #[inline]
    pub fn invalid_path(input: impl Into<String>, offset: usize, reason: &'static str) -> Self {
        MapperError::InvalidPath {
            input: input.into(),
            offset,
            reason,
        }
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
