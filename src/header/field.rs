//! The field descriptor: one column's name, wire type, width and decimal count.

use crate::error::DbfError;
use crate::header::{FIELD_NAME_LEN, MAX_DECIMAL_COUNT, MAX_TEXT_WIDTH};
use crate::types::{SemanticType, WireType};

/// An immutable description of one DBF column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    wire_type: WireType,
    byte_width: u8,
    decimal_count: u8,
}

impl FieldDescriptor {
    /// Builds a descriptor, enforcing the format's limits: a name of 1..=11
    /// bytes, a non-zero width, text widths up to 254 and at most 20
    /// decimals.
    pub fn new(
        name: impl Into<String>,
        wire_type: WireType,
        byte_width: u8,
        decimal_count: u8,
    ) -> Result<Self, DbfError> {
        let name = name.into();
        if name.is_empty() || name.len() > FIELD_NAME_LEN {
            return Err(DbfError::InvalidField(format!(
                "name '{}' must be 1 to {} bytes",
                name, FIELD_NAME_LEN
            )));
        }
        Self::from_descriptor(name, wire_type, byte_width, decimal_count)
    }

    /// Builds a descriptor from a parsed 32-byte slot. The name is taken as
    /// decoded: it may be empty, or longer than 11 bytes once non-UTF-8 bytes
    /// have been replaced.
    pub(crate) fn from_descriptor(
        name: String,
        wire_type: WireType,
        byte_width: u8,
        decimal_count: u8,
    ) -> Result<Self, DbfError> {
        if byte_width == 0 {
            return Err(DbfError::InvalidField(format!(
                "field '{}' has zero width",
                name
            )));
        }
        if wire_type.is_text() && byte_width as usize > MAX_TEXT_WIDTH {
            return Err(DbfError::InvalidField(format!(
                "text field '{}' is {} bytes wide, limit is {}",
                name, byte_width, MAX_TEXT_WIDTH
            )));
        }
        if decimal_count > MAX_DECIMAL_COUNT {
            return Err(DbfError::InvalidField(format!(
                "field '{}' has {} decimals, limit is {}",
                name, decimal_count, MAX_DECIMAL_COUNT
            )));
        }
        Ok(Self {
            name,
            wire_type,
            byte_width,
            decimal_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn byte_width(&self) -> u8 {
        self.byte_width
    }

    pub fn decimal_count(&self) -> u8 {
        self.decimal_count
    }

    /// The decoded kind of this column's values.
    pub fn semantic_type(&self) -> SemanticType {
        self.wire_type.semantic_type(self.decimal_count)
    }
}
