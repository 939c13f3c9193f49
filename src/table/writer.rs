// In: src/table/writer.rs

//! Whole-table write-out.
//!
//! Writing is two passes over the source. The planning pass picks a wire type
//! and width for every column from its element type (scanning values where
//! the width depends on them). The emission pass writes the header, one
//! record per row (a space deletion marker followed by each encoded field),
//! and the `0x1A` terminator.

use chrono::Local;
use std::io::Write;

use crate::codec::{encode_value, DATE_FIELD_WIDTH, FLOAT_FIELD_WIDTH};
use crate::config::{DbfConfig, WriteConfig};
use crate::error::DbfError;
use crate::header::{
    write_header, FieldDescriptor, Header, FIELD_NAME_LEN, FILE_TERMINATOR, MAX_TEXT_WIDTH,
    RECORD_VALID,
};
use crate::observability::{Diagnostic, DiagnosticSink, LogSink};
use crate::traits::{SourceColumn, TabularSource};
use crate::types::{ElementType, Value, WireType};
use crate::utils::truncate_on_char_boundary;

//==================================================================================
// 1. Public API
//==================================================================================

/// Writes `source` with the default configuration, sending diagnostics to the
/// `log` facade. Returns the number of bytes written.
pub fn write<W: Write>(dest: W, source: &dyn TabularSource) -> Result<usize, DbfError> {
    write_with(dest, source, &DbfConfig::default(), &mut LogSink)
}

/// Writes `source` as a DBF file and returns the number of bytes written.
pub fn write_with<W: Write>(
    mut dest: W,
    source: &dyn TabularSource,
    config: &DbfConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<usize, DbfError> {
    let fields = plan_fields(source, &config.write, sink)?;
    let header = build_header(source, fields, &config.write)?;

    let mut written = write_header(&mut dest, &header)?;

    let mut record = Vec::with_capacity(header.record_byte_size());
    for row in 0..source.row_count() {
        record.clear();
        record.push(RECORD_VALID);
        for (col, field) in header.fields().iter().enumerate() {
            let value = source.value(row, col)?;
            record.extend_from_slice(&encode_value(field, value.as_ref(), sink)?);
        }
        dest.write_all(&record)?;
        written += record.len();
    }

    dest.write_all(&[FILE_TERMINATOR])?;
    written += 1;
    dest.flush()?;

    log::debug!(
        "wrote DBF table: {} rows, {} columns, {} bytes",
        source.row_count(),
        header.field_count(),
        written
    );
    Ok(written)
}

//==================================================================================
// 2. Planning
//==================================================================================

/// Chooses one field descriptor per source column.
pub fn plan_fields(
    source: &dyn TabularSource,
    config: &WriteConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<FieldDescriptor>, DbfError> {
    let columns = source.columns();
    let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(columns.len());

    for (col, column) in columns.iter().enumerate() {
        let name = field_name(column, sink);
        let field = match &column.element_type {
            ElementType::Text => {
                let width = text_width(source, col, &column.name, sink)?;
                FieldDescriptor::new(name, WireType::Character, width, 0)?
            }
            ElementType::Boolean => FieldDescriptor::new(name, WireType::Logical, 1, 0)?,
            ElementType::Date => FieldDescriptor::new(name, WireType::Date, DATE_FIELD_WIDTH, 0)?,
            ElementType::Float => FieldDescriptor::new(
                name,
                WireType::Float,
                FLOAT_FIELD_WIDTH,
                config.float_decimal_count,
            )?,
            ElementType::Integer => {
                let width =
                    integer_width(source, col, &column.name, config.default_integer_width)?;
                FieldDescriptor::new(name, WireType::Numeric, width, 0)?
            }
            ElementType::Other(type_name) => {
                sink.report(Diagnostic::UnmappableColumnType {
                    column: column.name.clone(),
                    element_type: type_name.clone(),
                });
                let width = text_width(source, col, &column.name, sink)?;
                FieldDescriptor::new(name, WireType::Character, width, 0)?
            }
        };

        if let Some(earlier) = fields.iter().position(|f| f.name() == field.name()) {
            log::debug!("column {} repeats the name of column {}", col, earlier);
            sink.report(Diagnostic::DuplicateColumnName {
                name: field.name().to_string(),
                kept_index: col,
            });
        }
        log::debug!(
            "planned column '{}' as {} width {} decimals {}",
            field.name(),
            field.wire_type(),
            field.byte_width(),
            field.decimal_count()
        );
        fields.push(field);
    }
    Ok(fields)
}

fn build_header(
    source: &dyn TabularSource,
    fields: Vec<FieldDescriptor>,
    config: &WriteConfig,
) -> Result<Header, DbfError> {
    let record_count = u32::try_from(source.row_count()).map_err(|_| {
        DbfError::MalformedHeader(format!(
            "{} rows exceed the DBF record count limit",
            source.row_count()
        ))
    })?;
    let last_update = config
        .last_update
        .unwrap_or_else(|| Local::now().date_naive());
    Ok(Header::new(config.version, last_update, record_count, fields)?
        .with_language_id(config.language_id))
}

fn field_name(column: &SourceColumn, sink: &mut dyn DiagnosticSink) -> String {
    let truncated = truncate_on_char_boundary(&column.name, FIELD_NAME_LEN);
    if truncated.len() < column.name.len() {
        sink.report(Diagnostic::ColumnNameTruncated {
            original: column.name.clone(),
            truncated: truncated.to_string(),
        });
    }
    truncated.to_string()
}

/// Longest rendered value, at least 1, capped at 254 with a diagnostic.
fn text_width(
    source: &dyn TabularSource,
    col: usize,
    column_name: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<u8, DbfError> {
    let mut longest = 0;
    for row in 0..source.row_count() {
        let len = match source.value(row, col)? {
            Some(Value::Text(s)) => s.len(),
            Some(other) => other.to_string().len(),
            None => 0,
        };
        longest = longest.max(len);
    }
    if longest > MAX_TEXT_WIDTH {
        sink.report(Diagnostic::TextWidthTruncated {
            column: column_name.to_string(),
            observed: longest,
            width: MAX_TEXT_WIDTH,
        });
        return Ok(MAX_TEXT_WIDTH as u8);
    }
    Ok(longest.max(1) as u8)
}

/// Longest decimal rendering in the column, or `default_width` when the
/// column holds no integers. Sources that hand back text in an integer
/// column can exceed a one-byte width; that is an error, not a wrap.
fn integer_width(
    source: &dyn TabularSource,
    col: usize,
    column_name: &str,
    default_width: u8,
) -> Result<u8, DbfError> {
    let mut longest: Option<usize> = None;
    for row in 0..source.row_count() {
        if let Some(value) = source.value(row, col)? {
            let len = value.to_string().len();
            longest = Some(longest.map_or(len, |l| l.max(len)));
        }
    }
    match longest {
        None => Ok(default_width),
        Some(len) => u8::try_from(len).map_err(|_| DbfError::ValueEncodingTooWide {
            field: column_name.to_string(),
            len,
            limit: u8::MAX as usize,
        }),
    }
}
