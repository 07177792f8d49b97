//! Error types for schema construction.

use thiserror::Error;

/// Errors raised while normalizing a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema declares no columns.
    #[error("schema declares no columns")]
    Empty,

    /// Two entries declare the same column id.
    #[error("duplicate column id '{id}' in schema")]
    DuplicateColumn { id: String },

    /// A descriptor entry is neither a column id nor a parameter record.
    #[error("unexpected schema entry at position {position}: {found}")]
    UnexpectedEntry { position: usize, found: String },

    /// A parameter record contains a key that is not understood.
    #[error("unknown parameter '{parameter}' for column '{column}'")]
    UnknownParameter { column: String, parameter: String },

    /// A parameter has the wrong JSON type.
    #[error("invalid parameter '{parameter}' for column '{column}': expected {expected}")]
    InvalidParameter {
        column: String,
        parameter: String,
        expected: &'static str,
    },

    /// A default is not a scalar value.
    #[error("default for column '{column}' must be a scalar value")]
    InvalidDefault { column: String },

    /// A pattern rule does not compile.
    #[error("invalid pattern for column '{column}': {source}")]
    InvalidPattern {
        column: String,
        #[source]
        source: regex::Error,
    },

    /// A type rule names an unsupported value kind.
    #[error("unknown type '{kind}' for column '{column}'")]
    UnknownKind { column: String, kind: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
