//! Decoding: raw field bytes + wire type -> `Option<Value>`.

use chrono::NaiveDate;

use crate::error::DbfError;
use crate::types::{Value, WireType};
use crate::utils::{is_blank, read_native, read_native_i64, trim_end_padding, trim_padding};

/// Decodes one field's bytes.
///
/// `decimal_count` only affects `N` fields, which decode to integers when it
/// is zero and to floats otherwise.
pub fn decode_value(
    wire_type: WireType,
    decimal_count: u8,
    raw: &[u8],
) -> Result<Option<Value>, DbfError> {
    match wire_type {
        WireType::Character | WireType::Memo => Ok(decode_text(raw)),
        WireType::Date => decode_date(raw),
        WireType::Logical => decode_logical(raw),
        WireType::Numeric if decimal_count == 0 => {
            Ok(trim_padding(raw).parse::<i64>().ok().map(Value::Integer))
        }
        WireType::Numeric | WireType::Float => {
            Ok(trim_padding(raw).parse::<f64>().ok().map(Value::Float))
        }
        WireType::Double => Ok(read_native::<f64>(raw).map(Value::Float)),
        WireType::Integer => Ok(read_native_i64::<i32>(raw).map(Value::Integer)),
        WireType::AutoIncrement => Ok(read_native_i64::<i64>(raw).map(Value::Integer)),
    }
}

fn decode_text(raw: &[u8]) -> Option<Value> {
    if raw.iter().all(|&b| b == 0) {
        return None;
    }
    let text = trim_end_padding(raw);
    if text.is_empty() {
        None
    } else {
        Some(Value::Text(text.into_owned()))
    }
}

fn decode_date(raw: &[u8]) -> Result<Option<Value>, DbfError> {
    if is_blank(raw) {
        return Ok(None);
    }
    let malformed = || {
        DbfError::MalformedValue(format!(
            "'{}' is not a YYYYMMDD date",
            String::from_utf8_lossy(raw)
        ))
    };
    if raw.len() != 8 || !raw.iter().all(u8::is_ascii_digit) {
        return Err(malformed());
    }
    let digits = |range: std::ops::Range<usize>| -> u32 {
        raw[range]
            .iter()
            .fold(0, |acc, &b| acc * 10 + (b - b'0') as u32)
    };
    NaiveDate::from_ymd_opt(digits(0..4) as i32, digits(4..6), digits(6..8))
        .map(|d| Some(Value::Date(d)))
        .ok_or_else(malformed)
}

fn decode_logical(raw: &[u8]) -> Result<Option<Value>, DbfError> {
    match raw.first().copied() {
        Some(b'Y' | b'y' | b'T' | b't') => Ok(Some(Value::Boolean(true))),
        Some(b'N' | b'n' | b'F' | b'f') => Ok(Some(Value::Boolean(false))),
        Some(b'?') => Ok(None),
        Some(other) => Err(DbfError::UnknownLogicalValue(other)),
        None => Ok(None),
    }
}
