//! This module provides shared, low-level helpers for the fixed-width field
//! layout: padding, justification, trimming and native-endian reinterpretation.

use num_traits::ToPrimitive;
use std::borrow::Cow;

//==================================================================================
// 1. Padding & Justification
//==================================================================================

/// Right-justifies `text` in `width` bytes, padding with spaces on the left.
/// Returns `None` when `text` is already wider than `width`.
pub fn right_justify(text: &str, width: usize) -> Option<Vec<u8>> {
    if text.len() > width {
        return None;
    }
    let mut out = vec![b' '; width - text.len()];
    out.extend_from_slice(text.as_bytes());
    Some(out)
}

/// Left-aligns `bytes` in `width` bytes, filling the remainder with `pad`.
/// Returns `None` when `bytes` is already wider than `width`.
pub fn pad_right(bytes: &[u8], width: usize, pad: u8) -> Option<Vec<u8>> {
    if bytes.len() > width {
        return None;
    }
    let mut out = Vec::with_capacity(width);
    out.extend_from_slice(bytes);
    out.resize(width, pad);
    Some(out)
}

/// Truncates `name` to at most `max_len` bytes on a char boundary.
pub fn truncate_on_char_boundary(name: &str, max_len: usize) -> &str {
    if name.len() <= max_len {
        return name;
    }
    let mut end = max_len;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

//==================================================================================
// 2. Field Content Inspection
//==================================================================================

fn is_pad_byte(b: u8) -> bool {
    b == 0 || b.is_ascii_whitespace()
}

/// `true` when every byte is ASCII whitespace.
pub fn is_blank(raw: &[u8]) -> bool {
    raw.iter().all(|b| b.is_ascii_whitespace())
}

/// Field text with trailing whitespace and NUL padding removed.
pub fn trim_end_padding(raw: &[u8]) -> Cow<'_, str> {
    let end = raw
        .iter()
        .rposition(|&b| !is_pad_byte(b))
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&raw[..end])
}

/// Field text with padding removed on both sides, as numeric parsers expect it.
pub fn trim_padding(raw: &[u8]) -> Cow<'_, str> {
    let start = raw.iter().position(|&b| !is_pad_byte(b)).unwrap_or(raw.len());
    trim_end_padding(&raw[start..])
}

//==================================================================================
// 3. Native-Endian Reinterpretation
//==================================================================================

/// Reads a `T` from exactly `size_of::<T>()` unaligned native-endian bytes.
/// Any other length yields `None`.
pub fn read_native<T: bytemuck::Pod>(raw: &[u8]) -> Option<T> {
    bytemuck::try_pod_read_unaligned(raw).ok()
}

/// Reads a native-endian integer of type `T` and widens it to `i64`.
pub fn read_native_i64<T: bytemuck::Pod + ToPrimitive>(raw: &[u8]) -> Option<i64> {
    read_native::<T>(raw).and_then(|v| v.to_i64())
}
