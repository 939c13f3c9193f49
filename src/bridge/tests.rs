use super::*;
use crate::config::DbfConfig;
use crate::error::DbfError;
use crate::observability::Diagnostic;
use crate::table::{write_with, Table};
use crate::test_support::{example_table_bytes, init_test_logging};
use crate::traits::TabularSource;
use crate::types::{ElementType, Value};
use arrow::array::{
    Array, BinaryArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array, LargeStringArray, StringArray, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use std::io::Cursor;
use std::sync::Arc;

fn example_table() -> Table {
    init_test_logging();
    Table::load(Cursor::new(example_table_bytes())).unwrap()
}

fn batch(fields: Vec<Field>, columns: Vec<Arc<dyn Array>>) -> RecordBatch {
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
}

#[test]
fn test_arrow_schema_follows_semantic_types() {
    let schema = arrow_schema(&example_table());
    let types: Vec<_> = schema
        .fields()
        .iter()
        .map(|f| (f.name().as_str(), f.data_type().clone(), f.is_nullable()))
        .collect();
    assert_eq!(
        types,
        vec![
            ("CHAR", DataType::Utf8, true),
            ("DATE", DataType::Date32, true),
            ("BOOL", DataType::Boolean, true),
            ("FLOAT", DataType::Float64, true),
            ("NUMERIC", DataType::Float64, true),
            ("INTEGER", DataType::Int64, true),
        ]
    );
}

#[test]
fn test_to_record_batch_values_and_nulls() {
    let rb = to_record_batch(&example_table()).unwrap();
    assert_eq!(rb.num_rows(), 7);
    assert_eq!(rb.num_columns(), 6);

    let chars = rb.column(0).as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(chars.value(1), "John");
    assert!(chars.is_null(4));

    let dates = rb.column(1).as_any().downcast_ref::<Date32Array>().unwrap();
    assert_eq!(
        dates.value_as_date(0),
        NaiveDate::from_ymd_opt(1990, 1, 2)
    );
    assert!(dates.is_null(3));

    let bools = rb.column(2).as_any().downcast_ref::<BooleanArray>().unwrap();
    assert!(!bools.value(2));
    assert!(bools.is_null(3));

    let ints = rb.column(5).as_any().downcast_ref::<Int64Array>().unwrap();
    assert_eq!(ints.value(5), -105);
    assert!(ints.is_null(4));

    let floats = rb.column(3).as_any().downcast_ref::<Float64Array>().unwrap();
    assert_eq!(floats.value(0), 10.21);
}

#[test]
fn test_record_batch_reports_element_types() {
    let rb = batch(
        vec![
            Field::new("s", DataType::Utf8, true),
            Field::new("ls", DataType::LargeUtf8, true),
            Field::new("i", DataType::Int32, true),
            Field::new("f", DataType::Float32, true),
            Field::new("raw", DataType::Binary, true),
        ],
        vec![
            Arc::new(StringArray::from(vec!["a"])),
            Arc::new(LargeStringArray::from(vec!["b"])),
            Arc::new(Int32Array::from(vec![1])),
            Arc::new(Float32Array::from(vec![0.5f32])),
            Arc::new(BinaryArray::from(vec![&b"\x0a\x0b"[..]])),
        ],
    );
    let kinds: Vec<_> = TabularSource::columns(&rb)
        .into_iter()
        .map(|c| c.element_type)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ElementType::Text,
            ElementType::Text,
            ElementType::Integer,
            ElementType::Float,
            ElementType::Other("Binary".into()),
        ]
    );
    assert_eq!(rb.value(0, 1).unwrap(), Some(Value::Text("b".into())));
    assert_eq!(rb.value(0, 3).unwrap(), Some(Value::Float(0.5)));
    assert_eq!(rb.value(0, 4).unwrap(), Some(Value::Text("0a0b".into())));
}

#[test]
fn test_record_batch_bounds_and_nulls() {
    let rb = batch(
        vec![Field::new("i", DataType::Int64, true)],
        vec![Arc::new(Int64Array::from(vec![Some(3), None]))],
    );
    assert_eq!(rb.value(0, 0).unwrap(), Some(Value::Integer(3)));
    assert_eq!(rb.value(1, 0).unwrap(), None);
    assert!(matches!(rb.value(2, 0), Err(DbfError::RowOutOfBounds { row: 2, row_count: 2 })));
    assert!(matches!(rb.value(0, 1), Err(DbfError::ColumnNotFound(_))));
}

#[test]
fn test_u64_beyond_i64_fails() {
    let rb = batch(
        vec![Field::new("big", DataType::UInt64, false)],
        vec![Arc::new(UInt64Array::from(vec![7u64, u64::MAX]))],
    );
    assert_eq!(rb.value(0, 0).unwrap(), Some(Value::Integer(7)));
    assert!(matches!(
        rb.value(1, 0),
        Err(DbfError::ValueEncodingTooWide { field, .. }) if field == "big"
    ));
}

#[test]
fn test_record_batch_round_trips_through_dbf() {
    let date = NaiveDate::from_ymd_opt(2010, 12, 31).unwrap();
    let days = date
        .signed_duration_since(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
        .num_days() as i32;
    let rb = batch(
        vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("count", DataType::Int32, true),
            Field::new("ratio", DataType::Float64, true),
            Field::new("ok", DataType::Boolean, true),
            Field::new("day", DataType::Date32, true),
        ],
        vec![
            Arc::new(StringArray::from(vec![Some("Ranger"), None])),
            Arc::new(Int32Array::from(vec![Some(-105), Some(42)])),
            Arc::new(Float64Array::from(vec![Some(10.21), None])),
            Arc::new(BooleanArray::from(vec![Some(true), None])),
            Arc::new(Date32Array::from(vec![Some(days), None])),
        ],
    );

    let mut config = DbfConfig::default();
    config.write.last_update = NaiveDate::from_ymd_opt(2022, 1, 1);
    let mut out = Vec::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    write_with(&mut out, &rb, &config, &mut sink).unwrap();
    assert!(sink.is_empty());

    let table = Table::load(Cursor::new(out)).unwrap();
    let back = to_record_batch(&table).unwrap();
    assert_eq!(back.num_rows(), 2);

    let names = back.column(0).as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(names.value(0), "Ranger");
    assert!(names.is_null(1));
    let counts = back.column(1).as_any().downcast_ref::<Int64Array>().unwrap();
    assert_eq!(counts, &Int64Array::from(vec![-105, 42]));
    let ratios = back.column(2).as_any().downcast_ref::<Float64Array>().unwrap();
    assert_eq!(ratios, &Float64Array::from(vec![Some(10.21), None]));
    let oks = back.column(3).as_any().downcast_ref::<BooleanArray>().unwrap();
    assert_eq!(oks, &BooleanArray::from(vec![Some(true), None]));
    let dates = back.column(4).as_any().downcast_ref::<Date32Array>().unwrap();
    assert_eq!(dates, &Date32Array::from(vec![Some(days), None]));
}

#[test]
fn test_binary_column_is_written_as_text_with_warning() {
    let rb = batch(
        vec![Field::new("raw", DataType::Binary, true)],
        vec![Arc::new(BinaryArray::from(vec![&b"\x0a\x0b"[..]]))],
    );
    let mut out = Vec::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    write_with(&mut out, &rb, &DbfConfig::default(), &mut sink).unwrap();

    assert!(matches!(
        &sink[..],
        [Diagnostic::UnmappableColumnType { column, element_type }]
            if column == "raw" && element_type == "Binary"
    ));
    let table = Table::load(Cursor::new(out)).unwrap();
    assert_eq!(table.column_value("raw", 0).unwrap(), Some("0a0b".into()));
}
