//! Hand-assembled DBF fixtures shared by the unit tests.
//!
//! The bytes are laid out directly rather than produced by the writer, so
//! reader tests do not depend on writer correctness.

/// Builds one 32-byte field descriptor.
pub(crate) fn descriptor(name: &str, code: u8, width: u8, decimals: u8) -> [u8; 32] {
    let mut raw = [0u8; 32];
    raw[..name.len()].copy_from_slice(name.as_bytes());
    raw[11] = code;
    raw[16] = width;
    raw[17] = decimals;
    raw
}

/// Builds a 32-byte preamble dated 2020-05-15.
pub(crate) fn preamble(records: u32, header_size: u16, record_size: u16) -> [u8; 32] {
    let mut raw = [0u8; 32];
    raw[0] = 3;
    raw[1] = 120;
    raw[2] = 5;
    raw[3] = 15;
    raw[4..8].copy_from_slice(&records.to_le_bytes());
    raw[8..10].copy_from_slice(&header_size.to_le_bytes());
    raw[10..12].copy_from_slice(&record_size.to_le_bytes());
    raw
}

fn left_pad(s: &str, width: usize) -> Vec<u8> {
    format!("{:>width$}", s, width = width).into_bytes()
}

fn right_pad(s: &str, width: usize, pad: u8) -> Vec<u8> {
    let mut out = s.as_bytes().to_vec();
    out.resize(width, pad);
    out
}

/// Field layout of [`example_table_bytes`].
pub(crate) const EXAMPLE_FIELDS: [(&str, u8, u8, u8); 6] = [
    ("CHAR", b'C', 11, 0),
    ("DATE", b'D', 8, 0),
    ("BOOL", b'L', 1, 0),
    ("FLOAT", b'F', 20, 1),
    ("NUMERIC", b'N', 20, 1),
    ("INTEGER", b'N', 20, 0),
];

/// Record size of [`example_table_bytes`]: `1 + 11 + 8 + 1 + 20 + 20 + 20`.
pub(crate) const EXAMPLE_RECORD_SIZE: usize = 81;

/// Header size of [`example_table_bytes`]: `32 + 6 × 32 + 1`.
pub(crate) const EXAMPLE_HEADER_SIZE: usize = 225;

/// Seven records over six columns:
///
/// | row | CHAR      | DATE     | BOOL | FLOAT  | NUMERIC | INTEGER |
/// |-----|-----------|----------|------|--------|---------|---------|
/// | 0   | Bob       | 19900102 | T    | 10.21  | 11.21   | 100     |
/// | 1   | John      | 19900103 | Y    | 12.21  | 12.21   | 101     |
/// | 2   | Elizabeth | 19900104 | f    | 13.21  | 13.21   | 102     |
/// | 3   | Bob       | (blank)  | ?    | 14.21  | (blank) | 103     |
/// | 4   | (blank)   | 20000101 | n    | (blank)| 15.21   | (blank) |
/// | 5   | Ranger    | 20101231 | t    | -1e-5  | 16.21   | -105    |
/// | 6*  | Deleted   | 19990909 | F    | 17.21  | 17.21   | 106     |
///
/// Row 6 carries the deletion marker. The file ends with `0x1A`.
pub(crate) fn example_table_bytes() -> Vec<u8> {
    let rows: [(&str, &str, u8, &str, &str, &str, u8); 7] = [
        ("Bob", "19900102", b'T', "10.21", "11.21", "100", b' '),
        ("John", "19900103", b'Y', "12.21", "12.21", "101", b' '),
        ("Elizabeth", "19900104", b'f', "13.21", "13.21", "102", b' '),
        ("Bob", "        ", b'?', "14.21", "", "103", b' '),
        ("", "20000101", b'n', "", "15.21", "", b' '),
        ("Ranger", "20101231", b't', "-1e-5", "16.21", "-105", b' '),
        ("Deleted", "19990909", b'F', "17.21", "17.21", "106", b'*'),
    ];

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&preamble(
        rows.len() as u32,
        EXAMPLE_HEADER_SIZE as u16,
        EXAMPLE_RECORD_SIZE as u16,
    ));
    for (name, code, width, decimals) in EXAMPLE_FIELDS {
        bytes.extend_from_slice(&descriptor(name, code, width, decimals));
    }
    bytes.push(0x0D);

    for (text, date, flag, float, numeric, integer, marker) in rows {
        bytes.push(marker);
        // Text is space padded here, the way most third-party writers do it.
        bytes.extend(right_pad(text, 11, b' '));
        bytes.extend_from_slice(date.as_bytes());
        bytes.push(flag);
        bytes.extend(left_pad(float, 20));
        bytes.extend(left_pad(numeric, 20));
        bytes.extend(left_pad(integer, 20));
    }
    bytes.push(0x1A);
    bytes
}

/// Record width of `binary_table_bytes`: the flag plus 8 + 4 + 8 + 10.
pub(crate) const BINARY_RECORD_SIZE: usize = 31;

/// A three-row table using the binary numeric codes and a memo column.
///
/// | ID (`+`, 8) | COUNT (`I`, 4) | WEIGHT (`O`, 8) | NOTE (`M`, 10) |
/// |-------------|----------------|-----------------|----------------|
/// | 1           | 7              | 2.5             | first          |
/// | 2           | -3             | -0.125          | (blank)        |
/// | 2^40        | i32::MAX       | 1e300           | last           |
///
/// Binary values are stored in native byte order.
pub(crate) fn binary_table_bytes() -> Vec<u8> {
    let rows: [(i64, i32, f64, &str); 3] = [
        (1, 7, 2.5, "first"),
        (2, -3, -0.125, ""),
        (1 << 40, i32::MAX, 1e300, "last"),
    ];
    let fields: [(&str, u8, u8); 4] = [
        ("ID", b'+', 8),
        ("COUNT", b'I', 4),
        ("WEIGHT", b'O', 8),
        ("NOTE", b'M', 10),
    ];

    let header_size = 32 + 32 * fields.len() + 1;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&preamble(
        rows.len() as u32,
        header_size as u16,
        BINARY_RECORD_SIZE as u16,
    ));
    for (name, code, width) in fields {
        bytes.extend_from_slice(&descriptor(name, code, width, 0));
    }
    bytes.push(0x0D);

    for (id, count, weight, note) in rows {
        bytes.push(b' ');
        bytes.extend_from_slice(&id.to_ne_bytes());
        bytes.extend_from_slice(&count.to_ne_bytes());
        bytes.extend_from_slice(&weight.to_ne_bytes());
        bytes.extend(right_pad(note, 10, b' '));
    }
    bytes.push(0x1A);
    bytes
}

/// Routes `log` output through the test harness. Safe to call from every test.
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}
