//! This module provides the non-fatal diagnostics channel and logging setup.
//!
//! Lossy or degraded-but-successful outcomes (float precision loss, truncated
//! text widths, unmapped column types) are not errors. They are reported as
//! structured [`Diagnostic`] values to a caller-supplied [`DiagnosticSink`],
//! so callers can capture or assert on them. The default [`LogSink`] forwards
//! them to the `log` facade.

use log::Level;
use std::fmt;
use std::fs::OpenOptions;
use std::sync::Once;

//==================================================================================
// I. Diagnostics
//==================================================================================

/// A non-fatal event raised while reading or writing a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A float needed more than the field width in its default rendering and
    /// was written in shortened scientific notation.
    PrecisionLoss {
        field: String,
        value: f64,
        encoded: String,
    },
    /// A text column holds values longer than the 254-byte DBF limit; its
    /// width was capped.
    TextWidthTruncated {
        column: String,
        observed: usize,
        width: usize,
    },
    /// A source column has no DBF mapping and is written as text.
    UnmappableColumnType { column: String, element_type: String },
    /// A non-text value was rendered through its string form into a text field.
    RenderedAsText {
        field: String,
        value_kind: &'static str,
    },
    /// A header repeats a column name; lookups by name resolve to `kept_index`.
    DuplicateColumnName { name: String, kept_index: usize },
    /// A column name exceeded the 11-byte descriptor slot.
    ColumnNameTruncated { original: String, truncated: String },
    /// The header declared more bytes than its descriptors occupy; the gap was skipped.
    HeaderPaddingSkipped { skipped: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrecisionLoss {
                field,
                value,
                encoded,
            } => write!(
                f,
                "Float {:?} in field '{}' does not fit the DBF width; precision lost, written as '{}'",
                value, field, encoded
            ),
            Self::TextWidthTruncated {
                column,
                observed,
                width,
            } => write!(
                f,
                "Column '{}' holds strings of {} bytes; DBF text fields are capped at {}",
                column, observed, width
            ),
            Self::UnmappableColumnType {
                column,
                element_type,
            } => write!(
                f,
                "No known DBF mapping for type {} of column '{}'; data will be saved as text",
                element_type, column
            ),
            Self::RenderedAsText { field, value_kind } => write!(
                f,
                "Rendering a {} value as text for field '{}'",
                value_kind, field
            ),
            Self::DuplicateColumnName { name, kept_index } => write!(
                f,
                "Duplicate column name '{}'; lookups resolve to column {}",
                name, kept_index
            ),
            Self::ColumnNameTruncated {
                original,
                truncated,
            } => write!(
                f,
                "Column name '{}' is too long for DBF, truncated to '{}'",
                original, truncated
            ),
            Self::HeaderPaddingSkipped { skipped } => {
                write!(f, "Skipped {} padding bytes after the field list", skipped)
            }
        }
    }
}

/// A receiver for non-fatal diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `log::warn!`. Used by the convenience entry
/// points that take no explicit sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}

/// Collects diagnostics in order, for callers that want to inspect them.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("captured diagnostic: {}", diagnostic);
        self.push(diagnostic);
    }
}

//==================================================================================
// II. Logger Setup
//==================================================================================

static INIT_LOGGER: Once = Once::new();

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Installs an `env_logger` once per process.
///
/// `RUST_LOG` takes precedence over the `info` default, so
/// `RUST_LOG=xbase::header=debug` narrows output to header parsing. With
/// `log_file` set, lines are appended to that file instead of stderr.
pub fn enable_verbose_logging(log_file: Option<&str>) {
    INIT_LOGGER.call_once(|| {
        let env = env_logger::Env::default().default_filter_or(DEFAULT_FILTER);
        let mut builder = env_logger::Builder::from_env(env);
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "{}", log_line(record.level(), record.target(), record.args()))
        });
        if let Some(target) = log_file.and_then(append_target) {
            builder.target(target);
        }
        if builder.try_init().is_err() {
            log::debug!("a global logger is already installed, keeping it");
        }
    });
}

/// One output line: padded level, module path relative to the crate, message.
fn log_line(level: Level, target: &str, message: impl fmt::Display) -> String {
    let module = target.strip_prefix("xbase::").unwrap_or(target);
    format!("{:<5} {}: {}", level, module, message)
}

fn append_target(path: &str) -> Option<env_logger::Target> {
    match OpenOptions::new().append(true).create(true).open(path) {
        Ok(file) => Some(env_logger::Target::Pipe(Box::new(file))),
        Err(e) => {
            eprintln!("xbase: cannot append to '{}' ({}), logging to stderr", path, e);
            None
        }
    }
}
