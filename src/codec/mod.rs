// In: src/codec/mod.rs

//! The value codec: a bidirectional mapping between a field's fixed-width
//! bytes and a semantic [`Value`](crate::types::Value).
//!
//! Both directions match exhaustively on [`WireType`](crate::types::WireType).
//! Blank, NUL-filled or unparseable numeric content decodes to `None`
//! (absent); that is a normal outcome, not an error.

pub mod decode;
pub mod encode;

pub use decode::decode_value;
pub use encode::encode_value;

/// Width of the float fields the writer produces, and the budget the
/// float renderer works against.
pub const FLOAT_FIELD_WIDTH: u8 = 20;

/// Width of a `D` field.
pub const DATE_FIELD_WIDTH: u8 = 8;
