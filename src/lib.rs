//! This file is the root of the `xbase` Rust crate, a reader and writer for
//! xBase / dBASE III+ (`.dbf`) tables.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`header`, `codec`,
//!     `table`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the types most callers need, so `xbase::Table::load` and
//!     `xbase::write` work without reaching into submodules.
//!
//! Reading a file:
//!
//! ```no_run
//! use std::fs::File;
//!
//! let table = xbase::Table::load(File::open("people.dbf")?)?;
//! for row in &table {
//!     println!("{:?}", row.get("NAME")?);
//! }
//! # Ok::<(), xbase::DbfError>(())
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod header;
pub mod observability;
pub mod records;
pub mod table;
pub mod traits;
pub mod types;

mod utils;

#[cfg(test)]
mod test_support;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use config::{DbfConfig, DuplicateColumnPolicy, WriteConfig};
pub use error::DbfError;
pub use header::{FieldDescriptor, Header};
pub use observability::{enable_verbose_logging, Diagnostic, DiagnosticSink, LogSink};
pub use table::{write, write_with, ColumnSchema, Row, Rows, Table};
pub use traits::{SourceColumn, TabularSource};
pub use types::{ElementType, SemanticType, Value, WireType};
