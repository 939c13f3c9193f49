// In: src/header/mod.rs

//! Defines the DBF header: the 32-byte preamble, the field descriptor list and
//! the constants that pin down the on-disk layout.
//!
//! ```text
//! preamble (32 bytes)
//!   0      version
//!   1..4   last update: year-1900, month, day
//!   4..8   record count        (u32 LE)
//!   8..10  header size         (u16 LE)
//!   10..12 record size         (u16 LE)
//!   14     incomplete flag
//!   15     encrypted flag
//!   28     mdx flag
//!   29     language id
//! field descriptors (32 bytes each)
//!   0..11  name, NUL padded
//!   11     type code
//!   16     length
//!   17     decimal count
//! terminator 0x0D
//! ```

use chrono::{Datelike, NaiveDate};
use hashbrown::HashMap;

use crate::error::DbfError;

pub mod codec;
pub mod field;

pub use codec::{parse_header, write_header};
pub use field::FieldDescriptor;

//==================================================================================
// Format Constants
//==================================================================================
/// Size of the fixed preamble at the start of every file.
pub const PREAMBLE_LEN: usize = 32;
/// Size of one field descriptor.
pub const DESCRIPTOR_LEN: usize = 32;
/// Width of the name slot in a field descriptor.
pub const FIELD_NAME_LEN: usize = 11;
/// Ends the field descriptor list.
pub const FIELD_TERMINATOR: u8 = 0x0D;
/// Ends the record section.
pub const FILE_TERMINATOR: u8 = 0x1A;
/// Leading record byte of a live record.
pub const RECORD_VALID: u8 = b' ';
/// Leading record byte of a soft-deleted record.
pub const RECORD_DELETED: u8 = b'*';
/// Longest text value the format can hold.
pub const MAX_TEXT_WIDTH: usize = 254;
/// Largest decimal count a numeric descriptor may carry.
pub const MAX_DECIMAL_COUNT: u8 = 20;
/// Most descriptors whose header size still fits in a u16.
pub const MAX_FIELDS: usize = (u16::MAX as usize - PREAMBLE_LEN - 1) / DESCRIPTOR_LEN;

//==================================================================================
// Header
//==================================================================================

/// A parsed or freshly built DBF header.
///
/// `record_byte_size` and `header_byte_size` are derived from the field list,
/// so they always satisfy `1 + Σ widths` and `32 + 32n + 1`.
#[derive(Debug, Clone)]
pub struct Header {
    version: u8,
    last_update: NaiveDate,
    record_count: u32,
    declared_header_size: usize,
    incomplete: bool,
    encrypted: bool,
    mdx: bool,
    language_id: u8,
    fields: Vec<FieldDescriptor>,
    name_index: HashMap<String, usize>,
}

impl Header {
    /// Builds a header for writing. Flags are cleared and the language id is
    /// zero; see [`Header::with_language_id`].
    ///
    /// Duplicate names resolve last-wins, the same as when reading.
    pub fn new(
        version: u8,
        last_update: NaiveDate,
        record_count: u32,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self, DbfError> {
        check_geometry(&fields)?;
        let year = last_update.year();
        if !(1900..=1900 + u8::MAX as i32).contains(&year) {
            return Err(DbfError::MalformedHeader(format!(
                "last update year {} cannot be stored in a DBF header",
                year
            )));
        }
        let name_index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();
        let declared_header_size = header_size_for(fields.len());
        Ok(Self {
            version,
            last_update,
            record_count,
            declared_header_size,
            incomplete: false,
            encrypted: false,
            mdx: false,
            language_id: 0,
            fields,
            name_index,
        })
    }

    pub fn with_language_id(mut self, language_id: u8) -> Self {
        self.language_id = language_id;
        self
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn last_update(&self) -> NaiveDate {
        self.last_update
    }

    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    pub fn is_incomplete(&self) -> bool {
        self.incomplete
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn has_mdx(&self) -> bool {
        self.mdx
    }

    pub fn language_id(&self) -> u8 {
        self.language_id
    }

    /// The field descriptors in column (and on-disk) order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Resolves a column name to its index.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// `32 + 32 × field count + 1`.
    pub fn header_byte_size(&self) -> usize {
        header_size_for(self.fields.len())
    }

    /// The header size stored in the file, which may exceed
    /// [`Header::header_byte_size`] when a writer padded the header.
    pub fn declared_header_size(&self) -> usize {
        self.declared_header_size
    }

    /// One deletion-marker byte plus every field width.
    pub fn record_byte_size(&self) -> usize {
        record_size_for(&self.fields)
    }
}

fn header_size_for(field_count: usize) -> usize {
    PREAMBLE_LEN + DESCRIPTOR_LEN * field_count + 1
}

fn record_size_for(fields: &[FieldDescriptor]) -> usize {
    1 + fields.iter().map(|f| f.byte_width() as usize).sum::<usize>()
}

/// Rejects field lists whose header or record size overflows the u16 slots.
fn check_geometry(fields: &[FieldDescriptor]) -> Result<(), DbfError> {
    if fields.len() > MAX_FIELDS {
        return Err(DbfError::MalformedHeader(format!(
            "{} fields exceed the limit of {}",
            fields.len(),
            MAX_FIELDS
        )));
    }
    let record_size = record_size_for(fields);
    if record_size > u16::MAX as usize {
        return Err(DbfError::MalformedHeader(format!(
            "record size {} exceeds {}",
            record_size,
            u16::MAX
        )));
    }
    Ok(())
}
