// In: src/records/mod.rs

//! The record store: the raw fixed-width record bytes of a table, held in one
//! owned buffer, plus the geometry needed to locate any `(row, column)` field.
//!
//! Nothing is decoded here. Access hands out [`FieldView`]s, non-owning
//! `(buffer, offset, length)` windows that borrow from the store and cannot
//! outlive it.

use std::io::Read;
use std::ops::Range;

use crate::error::DbfError;
use crate::header::{Header, RECORD_DELETED};

//==================================================================================
// 1. Field View
//==================================================================================

/// A borrowed window onto one field's bytes inside the record buffer.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    buffer: &'a [u8],
    offset: usize,
    len: usize,
}

impl<'a> FieldView<'a> {
    /// Absolute offset of the field within the record buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The field's raw bytes.
    pub fn bytes(&self) -> &'a [u8] {
        &self.buffer[self.offset..self.offset + self.len]
    }
}

//==================================================================================
// 2. Record Store
//==================================================================================

/// Owns the record bytes of a table. `buffer.len()` is always
/// `record_size × record_count`.
#[derive(Debug, Clone)]
pub struct RecordStore {
    buffer: Vec<u8>,
    record_size: usize,
    record_count: usize,
    /// Offset of each field within a record, past the deletion marker.
    field_offsets: Vec<usize>,
    field_widths: Vec<usize>,
}

impl RecordStore {
    /// Wraps an already-read record buffer, checking it against the header geometry.
    pub fn new(header: &Header, buffer: Vec<u8>) -> Result<Self, DbfError> {
        let record_size = header.record_byte_size();
        let record_count = header.record_count() as usize;
        let expected = record_size
            .checked_mul(record_count)
            .ok_or_else(|| DbfError::MalformedHeader("record section size overflows".into()))?;
        if buffer.len() != expected {
            return Err(DbfError::MalformedHeader(format!(
                "record buffer holds {} bytes, header geometry needs {}",
                buffer.len(),
                expected
            )));
        }

        let mut field_offsets = Vec::with_capacity(header.field_count());
        let mut field_widths = Vec::with_capacity(header.field_count());
        let mut offset = 1;
        for field in header.fields() {
            field_offsets.push(offset);
            field_widths.push(field.byte_width() as usize);
            offset += field.byte_width() as usize;
        }

        Ok(Self {
            buffer,
            record_size,
            record_count,
            field_offsets,
            field_widths,
        })
    }

    /// Reads exactly `record_size × record_count` bytes from `reader`.
    ///
    /// The buffer grows as data arrives, so a header that claims an absurd
    /// record count fails with an I/O error at end of stream instead of
    /// allocating up front.
    pub fn read_from<R: Read>(reader: &mut R, header: &Header) -> Result<Self, DbfError> {
        let expected = (header.record_byte_size() as u64)
            .checked_mul(header.record_count() as u64)
            .ok_or_else(|| DbfError::MalformedHeader("record section size overflows".into()))?;

        let mut buffer = Vec::new();
        reader.by_ref().take(expected).read_to_end(&mut buffer)?;
        if (buffer.len() as u64) < expected {
            return Err(DbfError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "record section truncated: expected {} bytes, found {}",
                    expected,
                    buffer.len()
                ),
            )));
        }
        log::debug!(
            "loaded {} records of {} bytes",
            header.record_count(),
            header.record_byte_size()
        );
        Self::new(header, buffer)
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn record_size(&self) -> usize {
        self.record_size
    }

    pub fn field_count(&self) -> usize {
        self.field_offsets.len()
    }

    /// The whole record buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// `[start, start + width)` of field `col` in row `row`, or `None` when
    /// either index is out of range.
    pub fn byte_range_for(&self, row: usize, col: usize) -> Option<Range<usize>> {
        if row >= self.record_count {
            return None;
        }
        let start = row * self.record_size + *self.field_offsets.get(col)?;
        Some(start..start + self.field_widths[col])
    }

    pub fn field_view(&self, row: usize, col: usize) -> Option<FieldView<'_>> {
        let range = self.byte_range_for(row, col)?;
        Some(FieldView {
            buffer: &self.buffer,
            offset: range.start,
            len: range.len(),
        })
    }

    /// A whole record, deletion marker included.
    pub fn record(&self, row: usize) -> Option<&[u8]> {
        if row >= self.record_count {
            return None;
        }
        let start = row * self.record_size;
        Some(&self.buffer[start..start + self.record_size])
    }

    /// Whether the record's leading byte is the `*` deletion marker. Deletion
    /// is advisory: deleted records stay readable.
    pub fn is_deleted(&self, row: usize) -> Option<bool> {
        self.record(row).map(|r| r[0] == RECORD_DELETED)
    }
}
