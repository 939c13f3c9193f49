// In benches/codec_bench.rs

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;

use xbase::codec::{decode_value, encode_value};
use xbase::{
    DbfConfig, DbfError, Diagnostic, ElementType, FieldDescriptor, SourceColumn, TabularSource,
    Table, Value, WireType,
};

// --- Synthetic source ---

/// A generated five-column table: text, integer, float, boolean and date.
struct SyntheticSource {
    rows: usize,
}

impl TabularSource for SyntheticSource {
    fn columns(&self) -> Vec<SourceColumn> {
        vec![
            SourceColumn::new("NAME", ElementType::Text),
            SourceColumn::new("COUNT", ElementType::Integer),
            SourceColumn::new("RATIO", ElementType::Float),
            SourceColumn::new("ACTIVE", ElementType::Boolean),
            SourceColumn::new("SEEN", ElementType::Date),
        ]
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn value(&self, row: usize, column: usize) -> Result<Option<Value>, DbfError> {
        // Every seventh row is absent, to keep the null paths warm.
        if row % 7 == 3 {
            return Ok(None);
        }
        let value = match column {
            0 => Value::Text(format!("customer-{}", row)),
            1 => Value::Integer(row as i64 * 37 - 1000),
            2 => Value::Float(row as f64 / 3.0),
            3 => Value::Boolean(row % 2 == 0),
            _ => {
                let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
                Value::Date(base + chrono::Duration::days((row % 9000) as i64))
            }
        };
        Ok(Some(value))
    }
}

// --- Benchmark Suite ---

const BENCH_ROWS: usize = 10_000;

fn synthetic_file(rows: usize) -> Vec<u8> {
    let mut config = DbfConfig::default();
    config.write.last_update = NaiveDate::from_ymd_opt(2024, 1, 1);
    let mut out = Vec::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    xbase::write_with(&mut out, &SyntheticSource { rows }, &config, &mut sink).unwrap();
    out
}

fn bench_table(c: &mut Criterion) {
    let bytes = synthetic_file(BENCH_ROWS);
    let table = Table::load(Cursor::new(bytes.as_slice())).unwrap();

    let mut group = c.benchmark_group("Table");
    group.throughput(criterion::Throughput::Bytes(bytes.len() as u64));

    group.bench_function("Load", |b| {
        b.iter(|| black_box(Table::load(Cursor::new(black_box(bytes.as_slice())))))
    });
    group.bench_function("Materialize Float Column", |b| {
        b.iter(|| black_box(table.materialize_column(black_box("RATIO"))))
    });
    group.bench_function("Iterate Rows", |b| {
        b.iter(|| {
            for row in &table {
                black_box(row.values().unwrap());
            }
        })
    });
    group.bench_function("Write", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(bytes.len());
            let mut sink: Vec<Diagnostic> = Vec::new();
            black_box(xbase::write_with(
                &mut out,
                &table,
                &DbfConfig::default(),
                &mut sink,
            ))
        })
    });
    group.finish();
}

fn bench_value_codec(c: &mut Criterion) {
    let float_field = FieldDescriptor::new("F", WireType::Float, 20, 1).unwrap();
    let numbers: Vec<Value> = (0..1000).map(|i| Value::Float(i as f64 * 1.1e-3)).collect();
    let encoded: Vec<Vec<u8>> = numbers
        .iter()
        .map(|v| encode_value(&float_field, Some(v), &mut Vec::<Diagnostic>::new()).unwrap())
        .collect();

    let mut group = c.benchmark_group("Value Codec");
    group.bench_function("Encode Float", |b| {
        b.iter(|| {
            let mut sink: Vec<Diagnostic> = Vec::new();
            for v in &numbers {
                black_box(encode_value(&float_field, Some(black_box(v)), &mut sink).unwrap());
            }
        })
    });
    group.bench_function("Decode Float", |b| {
        b.iter(|| {
            for raw in &encoded {
                black_box(decode_value(WireType::Float, 1, black_box(raw)).unwrap());
            }
        })
    });
    group.bench_function("Encode Float With Precision Loss", |b| {
        b.iter(|| {
            let mut sink: Vec<Diagnostic> = Vec::new();
            black_box(encode_value(&float_field, Some(&Value::Float(f64::MIN)), &mut sink).unwrap())
        })
    });
    group.finish();
}

// These two lines generate the main function and register the benchmark groups.
criterion_group!(benches, bench_table, bench_value_codec);
criterion_main!(benches);
