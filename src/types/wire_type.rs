//! This module defines the canonical, type-safe representation of DBF field
//! type codes and the semantic kinds they decode to.

use crate::error::DbfError;
use arrow::datatypes::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The on-disk type code of a DBF field.
///
/// The set is closed: both codec directions match on it exhaustively, so adding
/// a code forces every decode and encode path to handle it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// `C`: space/NUL padded text.
    Character,
    /// `D`: `YYYYMMDD` ASCII date.
    Date,
    /// `N`: ASCII number; integer when the decimal count is zero.
    Numeric,
    /// `F`: ASCII floating point number.
    Float,
    /// `O`: 8-byte binary double.
    Double,
    /// `I`: 4-byte binary integer.
    Integer,
    /// `+`: 8-byte binary auto-increment integer.
    AutoIncrement,
    /// `L`: single-byte logical.
    Logical,
    /// `M`: memo block reference, surfaced as opaque text.
    Memo,
}

impl WireType {
    /// Converts a raw descriptor type byte into a `WireType`.
    pub fn from_code(code: u8) -> Result<Self, DbfError> {
        match code {
            b'C' => Ok(Self::Character),
            b'D' => Ok(Self::Date),
            b'N' => Ok(Self::Numeric),
            b'F' => Ok(Self::Float),
            b'O' => Ok(Self::Double),
            b'I' => Ok(Self::Integer),
            b'+' => Ok(Self::AutoIncrement),
            b'L' => Ok(Self::Logical),
            b'M' => Ok(Self::Memo),
            other => Err(DbfError::UnsupportedFieldType(other as char)),
        }
    }

    /// The byte written into the descriptor for this type.
    pub fn code(&self) -> u8 {
        match self {
            Self::Character => b'C',
            Self::Date => b'D',
            Self::Numeric => b'N',
            Self::Float => b'F',
            Self::Double => b'O',
            Self::Integer => b'I',
            Self::AutoIncrement => b'+',
            Self::Logical => b'L',
            Self::Memo => b'M',
        }
    }

    /// The semantic kind a field of this type decodes to.
    ///
    /// `decimal_count` only matters for `N`, which is an integer column when it
    /// carries no decimals and a float column otherwise.
    pub fn semantic_type(&self, decimal_count: u8) -> SemanticType {
        match self {
            Self::Character | Self::Memo => SemanticType::Text,
            Self::Date => SemanticType::Date,
            Self::Numeric if decimal_count == 0 => SemanticType::Integer,
            Self::Numeric | Self::Float | Self::Double => SemanticType::Float,
            Self::Integer | Self::AutoIncrement => SemanticType::Integer,
            Self::Logical => SemanticType::Boolean,
        }
    }

    /// Returns `true` for the text-carrying codes (`C`, `M`).
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Character | Self::Memo)
    }

    /// Returns `true` for the fixed-size binary numeric codes (`O`, `I`, `+`).
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Double | Self::Integer | Self::AutoIncrement)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code() as char)
    }
}

/// The decoded value kind of a column. Every semantic type is implicitly
/// nullable, since any field may decode to absent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
}

impl SemanticType {
    /// Converts a `SemanticType` into the Arrow `DataType` used by the bridge.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::Text => ArrowDataType::Utf8,
            Self::Integer => ArrowDataType::Int64,
            Self::Float => ArrowDataType::Float64,
            Self::Boolean => ArrowDataType::Boolean,
            Self::Date => ArrowDataType::Date32,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
