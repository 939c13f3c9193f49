// In: src/error.rs

//! This module defines the single, unified error type for the entire xbase library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Only hard failures live here. Non-fatal events (precision loss, unmapped
//! column types, truncated widths) are reported through
//! [`crate::observability::DiagnosticSink`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbfError {
    // =========================================================================
    // === Header / Schema Errors
    // =========================================================================
    #[error("Malformed DBF header: {0}")]
    MalformedHeader(String),

    #[error("Unsupported DBF field type code '{0}'")]
    UnsupportedFieldType(char),

    #[error("Invalid field descriptor: {0}")]
    InvalidField(String),

    #[error("Duplicate column name '{0}' in DBF header")]
    DuplicateColumn(String),

    // =========================================================================
    // === Table Access Errors
    // =========================================================================
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Row {row} is out of bounds for a table with {row_count} rows")]
    RowOutOfBounds { row: usize, row_count: usize },

    // =========================================================================
    // === Value Codec Errors
    // =========================================================================
    #[error("Unknown logical value byte 0x{0:02X}")]
    UnknownLogicalValue(u8),

    #[error("Malformed field value: {0}")]
    MalformedValue(String),

    #[error("Value too wide for DBF field '{field}': {len} bytes exceeds limit of {limit}")]
    ValueEncodingTooWide {
        field: String,
        len: usize,
        limit: usize,
    },

    #[error("Cannot encode a {value_kind} value into field '{field}' of wire type '{wire_code}'")]
    ValueTypeMismatch {
        field: String,
        wire_code: char,
        value_kind: &'static str,
    },

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O stream (e.g., a truncated file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error from the Serde JSON library, typically while reading a config document.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
