// In: src/table/mod.rs

//! The table facade: a loaded DBF file as a schema-described, read-only table.
//!
//! A [`Table`] owns its [`Header`] and [`RecordStore`] and is immutable after
//! construction. Row access is lazy: [`Row`] is just a table reference plus an
//! index, and values are decoded from the record buffer on each access. Only
//! [`Table::materialize_column`] decodes eagerly, copying a whole column out.
//!
//! Deleted records are not filtered. Iteration yields every record; callers
//! that care check [`Row::is_deleted`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufReader, Read};

use crate::codec::decode_value;
use crate::config::DbfConfig;
use crate::error::DbfError;
use crate::header::{parse_header, FieldDescriptor, Header};
use crate::observability::{Diagnostic, DiagnosticSink, LogSink};
use crate::records::RecordStore;
use crate::traits::{SourceColumn, TabularSource};
use crate::types::{SemanticType, Value};

pub mod writer;

pub use writer::{write, write_with};

//==================================================================================
// 1. Schema
//==================================================================================

/// One entry of a table schema. Every column is nullable, because any field
/// can decode to absent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub semantic_type: SemanticType,
    pub nullable: bool,
}

//==================================================================================
// 2. Table
//==================================================================================

/// A fully loaded DBF table.
#[derive(Debug, Clone)]
pub struct Table {
    header: Header,
    store: RecordStore,
}

impl Table {
    /// Loads a table with the default configuration, sending diagnostics to
    /// the `log` facade.
    pub fn load<R: Read>(reader: R) -> Result<Self, DbfError> {
        Self::load_with(reader, &DbfConfig::default(), &mut LogSink)
    }

    /// Loads a table: parses the header, skips any declared header padding and
    /// reads exactly `record_size × record_count` record bytes.
    ///
    /// Bytes after the record section (the `0x1A` terminator, trailing junk)
    /// are not read. The reader is dropped on every exit path.
    pub fn load_with<R: Read>(
        reader: R,
        config: &DbfConfig,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, DbfError> {
        let mut reader = BufReader::new(reader);
        let header = parse_header(&mut reader, config.duplicate_columns, sink)?;

        let padding = header.declared_header_size() - header.header_byte_size();
        if padding > 0 {
            let skipped = io::copy(&mut reader.by_ref().take(padding as u64), &mut io::sink())?;
            if skipped < padding as u64 {
                return Err(DbfError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended inside the header padding",
                )));
            }
            sink.report(Diagnostic::HeaderPaddingSkipped { skipped: padding });
        }

        let store = RecordStore::read_from(&mut reader, &header)?;
        Ok(Self { header, store })
    }

    /// Builds a table from an already parsed header and its record bytes.
    pub fn from_parts(header: Header, records: Vec<u8>) -> Result<Self, DbfError> {
        let store = RecordStore::new(&header, records)?;
        Ok(Self { header, store })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn records(&self) -> &RecordStore {
        &self.store
    }

    pub fn row_count(&self) -> usize {
        self.store.record_count()
    }

    pub fn column_count(&self) -> usize {
        self.header.field_count()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        self.header.fields()
    }

    /// The ordered `(name, semantic type, nullable)` schema.
    pub fn schema(&self) -> Vec<ColumnSchema> {
        self.header
            .fields()
            .iter()
            .map(|f| ColumnSchema {
                name: f.name().to_string(),
                semantic_type: f.semantic_type(),
                nullable: true,
            })
            .collect()
    }

    /// Resolves a column name, failing with `ColumnNotFound`.
    pub fn column_index(&self, name: &str) -> Result<usize, DbfError> {
        self.header
            .column_index(name)
            .ok_or_else(|| DbfError::ColumnNotFound(name.to_string()))
    }

    /// Decodes the value at `(row, col)`.
    pub fn value_at(&self, row: usize, col: usize) -> Result<Option<Value>, DbfError> {
        let field = self
            .header
            .field(col)
            .ok_or_else(|| DbfError::ColumnNotFound(format!("#{}", col)))?;
        let view = self
            .store
            .field_view(row, col)
            .ok_or(DbfError::RowOutOfBounds {
                row,
                row_count: self.row_count(),
            })?;
        decode_value(field.wire_type(), field.decimal_count(), view.bytes())
    }

    /// Decodes the value of the named column in `row`.
    pub fn column_value(&self, name: &str, row: usize) -> Result<Option<Value>, DbfError> {
        let col = self.column_index(name)?;
        self.value_at(row, col)
    }

    /// Decodes every row of the named column into a new vector. This is an
    /// O(rows) copy, unlike row access which decodes on demand.
    pub fn materialize_column(&self, name: &str) -> Result<Vec<Option<Value>>, DbfError> {
        let col = self.column_index(name)?;
        (0..self.row_count())
            .map(|row| self.value_at(row, col))
            .collect()
    }

    /// Whether `row` carries the deletion marker.
    pub fn is_deleted(&self, row: usize) -> Result<bool, DbfError> {
        self.store.is_deleted(row).ok_or(DbfError::RowOutOfBounds {
            row,
            row_count: self.row_count(),
        })
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.row_count()).then_some(Row { table: self, index })
    }

    /// Iterates every record in file order, deleted ones included. Each call
    /// starts a fresh pass.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            next: 0,
            end: self.row_count(),
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = Row<'a>;
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "DBF table: {} rows x {} columns (version {}, updated {})",
            self.row_count(),
            self.column_count(),
            self.header.version(),
            self.header.last_update()
        )?;
        for field in self.header.fields() {
            writeln!(
                f,
                "  {:<11} {} {:>3}.{:<2} {}",
                field.name(),
                field.wire_type(),
                field.byte_width(),
                field.decimal_count(),
                field.semantic_type()
            )?;
        }
        Ok(())
    }
}

/// A loaded table can be written back out.
impl TabularSource for Table {
    fn columns(&self) -> Vec<SourceColumn> {
        self.header
            .fields()
            .iter()
            .map(|f| SourceColumn::new(f.name(), f.semantic_type().into()))
            .collect()
    }

    fn row_count(&self) -> usize {
        Table::row_count(self)
    }

    fn value(&self, row: usize, column: usize) -> Result<Option<Value>, DbfError> {
        self.value_at(row, column)
    }
}

//==================================================================================
// 3. Rows
//==================================================================================

/// A lightweight reference to one record of a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Decodes the named column of this row.
    pub fn get(&self, name: &str) -> Result<Option<Value>, DbfError> {
        self.table.column_value(name, self.index)
    }

    /// Decodes column `col` of this row.
    pub fn get_at(&self, col: usize) -> Result<Option<Value>, DbfError> {
        self.table.value_at(self.index, col)
    }

    /// Decodes every column of this row, in column order.
    pub fn values(&self) -> Result<Vec<Option<Value>>, DbfError> {
        (0..self.table.column_count())
            .map(|col| self.get_at(col))
            .collect()
    }

    pub fn is_deleted(&self) -> bool {
        self.table.store.is_deleted(self.index).unwrap_or(false)
    }
}

/// Iterator over the rows of a [`Table`].
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    table: &'a Table,
    next: usize,
    end: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let row = Row {
            table: self.table,
            index: self.next,
        };
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl<'a> DoubleEndedIterator for Rows<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(Row {
            table: self.table,
            index: self.end,
        })
    }
}

impl<'a> ExactSizeIterator for Rows<'a> {}
