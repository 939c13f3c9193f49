//! This module defines the tabular-source contract the writer consumes.
//!
//! Anything that can list named, ordered columns with an element type and
//! yield one optional value per `(row, column)` can be written as a DBF file.
//! The crate implements it for its own [`Table`](crate::table::Table) and for
//! Arrow `RecordBatch`es (see [`crate::bridge`]).

use crate::error::DbfError;
use crate::types::{ElementType, Value};

/// One column as reported by a [`TabularSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumn {
    pub name: String,
    /// The type of the column's non-absent values.
    pub element_type: ElementType,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            name: name.into(),
            element_type,
        }
    }
}

/// A row-addressable table of optional values.
pub trait TabularSource {
    /// The columns in output order.
    fn columns(&self) -> Vec<SourceColumn>;

    fn row_count(&self) -> usize;

    /// The value at `(row, column)`; `None` means absent.
    fn value(&self, row: usize, column: usize) -> Result<Option<Value>, DbfError>;
}
