// In: src/header/codec.rs

//! Parses and serializes the DBF header byte-for-byte.
//!
//! Parsing reads the preamble, then reads descriptors until the terminator
//! byte shows up where the next descriptor would start. The terminator is
//! detected by peeking one byte through `BufRead`, so a descriptor that merely
//! starts with a non-terminator byte is never half consumed.

use chrono::{Datelike, NaiveDate};
use hashbrown::HashMap;
use std::io::{BufRead, Write};

use super::{
    check_geometry, Header, DESCRIPTOR_LEN, FIELD_NAME_LEN, FIELD_TERMINATOR, MAX_FIELDS,
    PREAMBLE_LEN,
};
use crate::config::DuplicateColumnPolicy;
use crate::error::DbfError;
use crate::header::field::FieldDescriptor;
use crate::observability::{Diagnostic, DiagnosticSink};
use crate::types::WireType;
use crate::utils::truncate_on_char_boundary;

//==================================================================================
// 1. Decode
//==================================================================================

/// Parses a header from the start of `reader`.
///
/// On success the reader is positioned just after the field terminator. Any
/// header padding declared beyond that point is left for the caller to skip.
pub fn parse_header<R: BufRead>(
    reader: &mut R,
    duplicates: DuplicateColumnPolicy,
    sink: &mut dyn DiagnosticSink,
) -> Result<Header, DbfError> {
    let mut preamble = [0u8; PREAMBLE_LEN];
    reader.read_exact(&mut preamble)?;

    let version = preamble[0];
    let last_update = decode_header_date(preamble[1], preamble[2], preamble[3])?;
    let record_count = u32::from_le_bytes([preamble[4], preamble[5], preamble[6], preamble[7]]);
    let declared_header_size = u16::from_le_bytes([preamble[8], preamble[9]]) as usize;
    let declared_record_size = u16::from_le_bytes([preamble[10], preamble[11]]) as usize;
    let incomplete = preamble[14] != 0;
    let encrypted = preamble[15] != 0;
    let mdx = preamble[28] != 0;
    let language_id = preamble[29];

    let mut fields = Vec::new();
    loop {
        match peek_byte(reader)? {
            Some(FIELD_TERMINATOR) => {
                reader.consume(1);
                break;
            }
            Some(_) => {}
            None => {
                return Err(DbfError::MalformedHeader(
                    "stream ended before the field list terminator".into(),
                ))
            }
        }
        if fields.len() == MAX_FIELDS {
            return Err(DbfError::MalformedHeader(format!(
                "more than {} field descriptors",
                MAX_FIELDS
            )));
        }
        let mut raw = [0u8; DESCRIPTOR_LEN];
        reader.read_exact(&mut raw)?;
        fields.push(decode_descriptor(&raw)?);
    }
    check_geometry(&fields)?;

    let header_size = super::header_size_for(fields.len());
    if declared_header_size < header_size {
        return Err(DbfError::MalformedHeader(format!(
            "declared header size {} is smaller than the {} bytes its {} fields occupy",
            declared_header_size,
            header_size,
            fields.len()
        )));
    }
    let record_size = super::record_size_for(&fields);
    if declared_record_size != record_size {
        return Err(DbfError::MalformedHeader(format!(
            "declared record size {} does not match field widths ({} bytes)",
            declared_record_size, record_size
        )));
    }

    let name_index = index_names(&fields, duplicates, sink)?;
    log::debug!(
        "parsed DBF header: version={} records={} fields={} record_size={}",
        version,
        record_count,
        fields.len(),
        record_size
    );

    Ok(Header {
        version,
        last_update,
        record_count,
        declared_header_size,
        incomplete,
        encrypted,
        mdx,
        language_id,
        fields,
        name_index,
    })
}

fn peek_byte<R: BufRead>(reader: &mut R) -> Result<Option<u8>, DbfError> {
    let buf = reader.fill_buf()?;
    Ok(buf.first().copied())
}

fn decode_header_date(year: u8, month: u8, day: u8) -> Result<NaiveDate, DbfError> {
    NaiveDate::from_ymd_opt(1900 + year as i32, month as u32, day as u32).ok_or_else(|| {
        DbfError::MalformedHeader(format!(
            "invalid last update date bytes {:02X} {:02X} {:02X}",
            year, month, day
        ))
    })
}

fn decode_descriptor(raw: &[u8; DESCRIPTOR_LEN]) -> Result<FieldDescriptor, DbfError> {
    let name_bytes = &raw[..FIELD_NAME_LEN];
    let name_end = name_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(FIELD_NAME_LEN);
    let name = String::from_utf8_lossy(&name_bytes[..name_end])
        .trim_end()
        .to_string();

    let wire_type = WireType::from_code(raw[11])?;
    let byte_width = raw[16];
    let decimal_count = raw[17];

    FieldDescriptor::from_descriptor(name, wire_type, byte_width, decimal_count)
        .map_err(|e| DbfError::MalformedHeader(e.to_string()))
}

/// Builds the name -> index map under the given duplicate policy.
fn index_names(
    fields: &[FieldDescriptor],
    duplicates: DuplicateColumnPolicy,
    sink: &mut dyn DiagnosticSink,
) -> Result<HashMap<String, usize>, DbfError> {
    let mut index = HashMap::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        if index.insert(field.name().to_string(), i).is_some() {
            match duplicates {
                DuplicateColumnPolicy::Reject => {
                    return Err(DbfError::DuplicateColumn(field.name().to_string()))
                }
                DuplicateColumnPolicy::LastWins => sink.report(Diagnostic::DuplicateColumnName {
                    name: field.name().to_string(),
                    kept_index: i,
                }),
            }
        }
    }
    Ok(index)
}

//==================================================================================
// 2. Encode
//==================================================================================

/// Serializes `header`, returning the number of bytes written.
///
/// The header size is recomputed from the field list and every reserved
/// region is zero.
pub fn write_header<W: Write>(writer: &mut W, header: &Header) -> Result<usize, DbfError> {
    let header_size = header.header_byte_size();
    let record_size = header.record_byte_size();
    let mut buf = Vec::with_capacity(header_size);

    let mut preamble = [0u8; PREAMBLE_LEN];
    preamble[0] = header.version;
    let date = header.last_update;
    preamble[1] = u8::try_from(date.year() - 1900).map_err(|_| {
        DbfError::MalformedHeader(format!("last update year {} out of range", date.year()))
    })?;
    preamble[2] = date.month() as u8;
    preamble[3] = date.day() as u8;
    preamble[4..8].copy_from_slice(&header.record_count.to_le_bytes());
    preamble[8..10].copy_from_slice(&(header_size as u16).to_le_bytes());
    preamble[10..12].copy_from_slice(&(record_size as u16).to_le_bytes());
    preamble[14] = header.incomplete as u8;
    preamble[15] = header.encrypted as u8;
    preamble[28] = header.mdx as u8;
    preamble[29] = header.language_id;
    buf.extend_from_slice(&preamble);

    for field in &header.fields {
        buf.extend_from_slice(&encode_descriptor(field));
    }
    buf.push(FIELD_TERMINATOR);

    writer.write_all(&buf)?;
    Ok(buf.len())
}

fn encode_descriptor(field: &FieldDescriptor) -> [u8; DESCRIPTOR_LEN] {
    let mut raw = [0u8; DESCRIPTOR_LEN];
    // Parsed names can outgrow the slot after lossy decoding.
    let name = truncate_on_char_boundary(field.name(), FIELD_NAME_LEN).as_bytes();
    raw[..name.len()].copy_from_slice(name);
    raw[11] = field.wire_type().code();
    raw[16] = field.byte_width();
    raw[17] = field.decimal_count();
    raw
}
