// In: src/config.rs

//! The single source of truth for xbase read and write configuration.
//!
//! `DbfConfig` is created once at the application boundary (e.g., from a JSON
//! document or in code) and passed by reference to the load and write entry
//! points. Every field has a default, so an empty document `{}` is a valid
//! configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DbfError;

//==================================================================================
// I. Read-Side Configuration
//==================================================================================

/// How a header that repeats a column name is treated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateColumnPolicy {
    /// **Default:** The later column wins name lookups. The earlier column is
    /// still reachable by index and through row iteration. A
    /// `DuplicateColumnName` diagnostic is reported.
    #[default]
    LastWins,

    /// Parsing fails with `DbfError::DuplicateColumn`.
    Reject,
}

//==================================================================================
// II. Write-Side Configuration
//==================================================================================

/// Settings applied when a tabular source is written out as a DBF file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct WriteConfig {
    /// The version byte of the header. dBASE III+ without memo is `3`.
    #[serde(default = "default_version")]
    pub version: u8,

    /// The language driver byte of the header.
    #[serde(default)]
    pub language_id: u8,

    /// The decimal count stamped on float (`F`) fields.
    #[serde(default = "default_float_decimal_count")]
    pub float_decimal_count: u8,

    /// Width of an integer (`N`) column that holds no values at all.
    #[serde(default = "default_integer_width")]
    pub default_integer_width: u8,

    /// Fixed last-update date. `None` stamps today's local date.
    #[serde(default)]
    pub last_update: Option<NaiveDate>,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            language_id: 0,
            float_decimal_count: default_float_decimal_count(),
            default_integer_width: default_integer_width(),
            last_update: None,
        }
    }
}

//==================================================================================
// III. The Unified DbfConfig
//==================================================================================

/// The single, unified configuration for reading and writing DBF tables.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DbfConfig {
    /// Treatment of repeated column names when parsing a header.
    #[serde(default)]
    pub duplicate_columns: DuplicateColumnPolicy,

    /// Settings for `table::write_with`.
    #[serde(default)]
    pub write: WriteConfig,
}

impl DbfConfig {
    /// Parses a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, DbfError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Helper for `serde` to provide the default header version.
fn default_version() -> u8 {
    3
}

/// Helper for `serde` to provide the default float decimal count.
fn default_float_decimal_count() -> u8 {
    1
}

/// Helper for `serde` to provide the default integer width.
fn default_integer_width() -> u8 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = DbfConfig::from_json("{}").unwrap();
        assert_eq!(config, DbfConfig::default());
        assert_eq!(config.write.version, 3);
        assert_eq!(config.write.float_decimal_count, 1);
        assert_eq!(config.write.default_integer_width, 20);
        assert_eq!(config.duplicate_columns, DuplicateColumnPolicy::LastWins);
    }

    #[test]
    fn test_partial_document_overrides_fields() {
        let json = r#"{
            "duplicate_columns": "reject",
            "write": { "language_id": 87, "last_update": "2024-02-29" }
        }"#;
        let config = DbfConfig::from_json(json).unwrap();
        assert_eq!(config.duplicate_columns, DuplicateColumnPolicy::Reject);
        assert_eq!(config.write.language_id, 87);
        assert_eq!(config.write.version, 3);
        assert_eq!(
            config.write.last_update,
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_invalid_document_is_a_serde_error() {
        let result = DbfConfig::from_json(r#"{ "duplicate_columns": "sometimes" }"#);
        assert!(matches!(result, Err(DbfError::SerdeJson(_))));
    }
}
