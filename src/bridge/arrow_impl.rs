// In: src/bridge/arrow_impl.rs

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanBuilder, Date32Builder, Float64Builder, Int64Builder,
    StringBuilder,
};
use arrow::datatypes::*;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::temporal_conversions::{date32_to_datetime, date64_to_datetime};
use arrow::util::display::array_value_to_string;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::DbfError;
use crate::table::Table;
use crate::traits::{SourceColumn, TabularSource};
use crate::types::{ElementType, SemanticType, Value};

//==================================================================================
// 1. Table -> Arrow
//==================================================================================

/// The Arrow schema of a table: one nullable field per column.
pub fn arrow_schema(table: &Table) -> Schema {
    let fields: Vec<Field> = table
        .schema()
        .into_iter()
        .map(|c| Field::new(c.name, c.semantic_type.to_arrow_type(), c.nullable))
        .collect();
    Schema::new(fields)
}

/// Decodes every column of `table` into a single `RecordBatch`.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch, DbfError> {
    let schema = Arc::new(arrow_schema(table));
    let columns = (0..table.column_count())
        .map(|col| column_to_array(table, col))
        .collect::<Result<Vec<ArrayRef>, DbfError>>()?;
    log::debug!(
        "converted DBF table to Arrow: {} rows, {} columns",
        table.row_count(),
        columns.len()
    );
    // An explicit row count keeps zero-column tables representable.
    let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}

/// DATA MARSHALLING
/// Builds the Arrow array for one column. Decoded values are coerced to the
/// column's semantic type; a value that cannot be is appended as null.
fn column_to_array(table: &Table, col: usize) -> Result<ArrayRef, DbfError> {
    let rows = table.row_count();
    let semantic_type = table.fields()[col].semantic_type();

    macro_rules! build_column {
        ($builder:expr, $extract:expr) => {{
            let mut builder = $builder;
            for row in 0..rows {
                let value = table.value_at(row, col)?;
                builder.append_option(value.as_ref().and_then($extract));
            }
            Arc::new(builder.finish()) as ArrayRef
        }};
    }

    let array = match semantic_type {
        SemanticType::Text => build_column!(
            StringBuilder::with_capacity(rows, rows * 8),
            |v: &Value| Some(v.to_string())
        ),
        SemanticType::Integer => build_column!(Int64Builder::with_capacity(rows), Value::as_i64),
        SemanticType::Float => build_column!(Float64Builder::with_capacity(rows), Value::as_f64),
        SemanticType::Boolean => {
            build_column!(BooleanBuilder::with_capacity(rows), Value::as_bool)
        }
        SemanticType::Date => build_column!(Date32Builder::with_capacity(rows), |v: &Value| v
            .as_date()
            .map(days_since_epoch)),
    };
    Ok(array)
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    // `NaiveDate::default()` is 1970-01-01.
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

//==================================================================================
// 2. Arrow -> TabularSource
//==================================================================================

/// Maps an Arrow data type onto the writer's element types.
pub fn element_type_for(data_type: &DataType) -> ElementType {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 => ElementType::Text,
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => ElementType::Integer,
        DataType::Float32 | DataType::Float64 => ElementType::Float,
        DataType::Boolean => ElementType::Boolean,
        DataType::Date32 | DataType::Date64 => ElementType::Date,
        other => ElementType::Other(other.to_string()),
    }
}

impl TabularSource for RecordBatch {
    fn columns(&self) -> Vec<SourceColumn> {
        self.schema()
            .fields()
            .iter()
            .map(|f| SourceColumn::new(f.name().as_str(), element_type_for(f.data_type())))
            .collect()
    }

    fn row_count(&self) -> usize {
        self.num_rows()
    }

    fn value(&self, row: usize, column: usize) -> Result<Option<Value>, DbfError> {
        if column >= self.num_columns() {
            return Err(DbfError::ColumnNotFound(format!("#{}", column)));
        }
        if row >= self.num_rows() {
            return Err(DbfError::RowOutOfBounds {
                row,
                row_count: self.num_rows(),
            });
        }
        let array = self.column(column);
        if array.is_null(row) {
            return Ok(None);
        }
        let schema = self.schema();
        array_value(array.as_ref(), row, schema.field(column).name()).map(Some)
    }
}

/// Reads one non-null cell. The caller has checked bounds and nullness.
fn array_value(array: &dyn Array, row: usize, name: &str) -> Result<Value, DbfError> {
    macro_rules! integer {
        ($T:ty) => {
            Value::Integer(array.as_primitive::<$T>().value(row) as i64)
        };
    }

    let value = match array.data_type() {
        DataType::Utf8 => Value::Text(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(array.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => integer!(Int8Type),
        DataType::Int16 => integer!(Int16Type),
        DataType::Int32 => integer!(Int32Type),
        DataType::Int64 => integer!(Int64Type),
        DataType::UInt8 => integer!(UInt8Type),
        DataType::UInt16 => integer!(UInt16Type),
        DataType::UInt32 => integer!(UInt32Type),
        DataType::UInt64 => {
            let raw = array.as_primitive::<UInt64Type>().value(row);
            let narrow = i64::try_from(raw).map_err(|_| DbfError::ValueEncodingTooWide {
                field: name.to_string(),
                len: raw.to_string().len(),
                limit: i64::MAX.to_string().len(),
            })?;
            Value::Integer(narrow)
        }
        DataType::Float32 => Value::Float(array.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(array.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Boolean(array.as_boolean().value(row)),
        DataType::Date32 => {
            let days = array.as_primitive::<Date32Type>().value(row);
            let date = date32_to_datetime(days).ok_or_else(|| {
                DbfError::MalformedValue(format!("Date32 value {} is out of range", days))
            })?;
            Value::Date(date.date())
        }
        DataType::Date64 => {
            let millis = array.as_primitive::<Date64Type>().value(row);
            let date = date64_to_datetime(millis).ok_or_else(|| {
                DbfError::MalformedValue(format!("Date64 value {} is out of range", millis))
            })?;
            Value::Date(date.date())
        }
        _ => Value::Text(array_value_to_string(array, row)?),
    };
    Ok(value)
}
