//! Error types for table operations.

use buddy_model::SchemaError;
use thiserror::Error;

/// Errors that can occur while building, loading or rendering a table.
#[derive(Debug, Error)]
pub enum TableError {
    // === Schema Errors ===
    /// The schema could not be normalized.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    // === Load Errors ===
    /// Input text contains no header record.
    #[error("input has no header record")]
    EmptyInput,

    /// Header record width differs from the schema.
    #[error("input has {found} columns but the schema declares {expected}")]
    ColumnCount { expected: usize, found: usize },

    /// A header field does not name the schema column at its position.
    #[error("column {position}: expected header '{expected}', found '{found}'")]
    HeaderMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    // === Write Errors ===
    /// Write to a column the schema does not declare.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// A value failed the column's pattern or type rule.
    #[error("invalid value '{value}' for column '{column}'")]
    Validation { column: String, value: String },

    /// The cell already holds a value in the open row.
    #[error("cell '{column}' in row {row} already contains data")]
    DuplicateCell { column: String, row: usize },

    // === Closure Errors ===
    /// A required column is empty in the row being closed.
    #[error("cannot close row {row}: required column '{column}' is empty")]
    RequiredField { column: String, row: usize },

    // === Row Errors ===
    /// No closed row at the given index.
    #[error("row {index} does not exist (table has {len} closed rows)")]
    RowOutOfRange { index: usize, len: usize },

    // === Tokenizer Errors ===
    /// The CSV tokenizer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing rendered output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
