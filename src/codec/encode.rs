//! Encoding: `Option<Value>` + field descriptor -> exactly `byte_width` bytes.
//!
//! Floats get special handling. The format stores them as ASCII in a
//! 20-character field, so a float whose shortest round-trip rendering is
//! longer is rewritten in scientific notation with as many mantissa digits as
//! still fit, and a `PrecisionLoss` diagnostic is reported.

use num_traits::ToPrimitive;

use crate::error::DbfError;
use crate::header::{FieldDescriptor, MAX_TEXT_WIDTH};
use crate::observability::{Diagnostic, DiagnosticSink};
use crate::types::{Value, WireType};
use crate::utils::{pad_right, right_justify};

/// Most mantissa digits after the point worth trying; an f64 carries 17
/// significant digits.
const MAX_MANTISSA_PRECISION: usize = 16;

/// Encodes one value (or absence) into the field's fixed-width byte form.
pub fn encode_value(
    field: &FieldDescriptor,
    value: Option<&Value>,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<u8>, DbfError> {
    let width = field.byte_width() as usize;
    let value = match value {
        Some(v) => v,
        None => return Ok(encode_absent(field.wire_type(), width)),
    };

    match (field.wire_type(), value) {
        (WireType::Character | WireType::Memo, value) => encode_text(field, value, sink),
        (WireType::Logical, Value::Boolean(b)) => {
            let flag = if *b { b"T" } else { b"F" };
            fit(field, flag, b' ')
        }
        (WireType::Date, Value::Date(d)) => {
            let text = d.format("%Y%m%d").to_string();
            if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(too_wide(field, text.len(), 8));
            }
            fit(field, text.as_bytes(), b' ')
        }
        (WireType::Numeric, Value::Integer(v)) if field.decimal_count() == 0 => {
            let text = v.to_string();
            right_justify(&text, width).ok_or_else(|| too_wide(field, text.len(), width))
        }
        (WireType::Numeric | WireType::Float, Value::Float(x)) => encode_float(field, *x, sink),
        (WireType::Numeric | WireType::Float, Value::Integer(v)) => {
            encode_float(field, *v as f64, sink)
        }
        (WireType::Double, Value::Float(x)) => fit_binary(field, &x.to_ne_bytes()),
        (WireType::Double, Value::Integer(v)) => fit_binary(field, &(*v as f64).to_ne_bytes()),
        (WireType::Integer, Value::Integer(v)) => {
            let narrow = v
                .to_i32()
                .ok_or_else(|| too_wide(field, v.to_string().len(), 4))?;
            fit_binary(field, &narrow.to_ne_bytes())
        }
        (WireType::AutoIncrement, Value::Integer(v)) => fit_binary(field, &v.to_ne_bytes()),
        (wire, value) => Err(DbfError::ValueTypeMismatch {
            field: field.name().to_string(),
            wire_code: wire.code() as char,
            value_kind: value.kind_name(),
        }),
    }
}

/// The placeholder written for a missing value.
fn encode_absent(wire_type: WireType, width: usize) -> Vec<u8> {
    match wire_type {
        WireType::Logical => {
            let mut out = vec![b' '; width];
            out[0] = b'?';
            out
        }
        WireType::Character | WireType::Memo => vec![0u8; width],
        WireType::Date
        | WireType::Numeric
        | WireType::Float
        | WireType::Double
        | WireType::Integer
        | WireType::AutoIncrement => vec![b' '; width],
    }
}

fn encode_text(
    field: &FieldDescriptor,
    value: &Value,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<u8>, DbfError> {
    let rendered;
    let text = match value {
        Value::Text(s) => s.as_str(),
        other => {
            sink.report(Diagnostic::RenderedAsText {
                field: field.name().to_string(),
                value_kind: other.kind_name(),
            });
            rendered = other.to_string();
            rendered.as_str()
        }
    };
    if text.len() > MAX_TEXT_WIDTH {
        return Err(too_wide(field, text.len(), MAX_TEXT_WIDTH));
    }
    fit(field, text.as_bytes(), 0)
}

/// Renders `x` right-justified in the field width, falling back to shortened
/// scientific notation when the default rendering does not fit.
fn encode_float(
    field: &FieldDescriptor,
    x: f64,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<u8>, DbfError> {
    let width = field.byte_width() as usize;
    let default = format!("{:?}", x);
    if let Some(out) = right_justify(&default, width) {
        return Ok(out);
    }

    // Rust's `{:e}` never emits a `+` on positive exponents, which is the
    // compact form the width budget needs.
    for precision in (0..=MAX_MANTISSA_PRECISION).rev() {
        let shortened = format!("{:.*e}", precision, x);
        if let Some(out) = right_justify(&shortened, width) {
            sink.report(Diagnostic::PrecisionLoss {
                field: field.name().to_string(),
                value: x,
                encoded: shortened,
            });
            return Ok(out);
        }
    }
    Err(too_wide(field, default.len(), width))
}

/// Left-aligns `bytes` in the field width.
fn fit(field: &FieldDescriptor, bytes: &[u8], pad: u8) -> Result<Vec<u8>, DbfError> {
    let width = field.byte_width() as usize;
    pad_right(bytes, width, pad).ok_or_else(|| too_wide(field, bytes.len(), width))
}

/// Binary numerics must fill their field exactly.
fn fit_binary(field: &FieldDescriptor, bytes: &[u8]) -> Result<Vec<u8>, DbfError> {
    if bytes.len() != field.byte_width() as usize {
        return Err(DbfError::InvalidField(format!(
            "binary field '{}' is {} bytes wide, its values need {}",
            field.name(),
            field.byte_width(),
            bytes.len()
        )));
    }
    Ok(bytes.to_vec())
}

fn too_wide(field: &FieldDescriptor, len: usize, limit: usize) -> DbfError {
    DbfError::ValueEncodingTooWide {
        field: field.name().to_string(),
        len,
        limit,
    }
}
