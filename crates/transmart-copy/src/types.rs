//! Writer-specific types: errors, configuration and statistics.

use std::path::{Path, PathBuf};

use thiserror::Error;
use transmart_types::ParseValueTypeError;

use crate::tables::Table;

/// Errors that can occur while writing a data collection.
#[derive(Error, Debug)]
pub enum CopyError {
    /// I/O error creating or writing an output file.
    #[error("IO error writing output: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error for blob columns.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The collection is structurally invalid.
    #[error("Invalid collection: {}", .errors.join("; "))]
    StructuralInvalid {
        /// Every violation found.
        errors: Vec<String>,
    },

    /// An entity refers to another entity that was never registered.
    #[error("Unresolved {kind} reference: {key}")]
    UnresolvedReference {
        /// Kind of the referenced entity.
        kind: &'static str,
        /// Natural key of the referenced entity.
        key: String,
    },

    /// A value type outside the supported kinds.
    #[error("Value type not supported: {value}")]
    UnsupportedValueType {
        /// The rejected value type.
        value: String,
    },

    /// The output location cannot be used.
    #[error("Cannot write to {path}: {reason}")]
    DestinationConflict {
        /// The output location.
        path: String,
        /// Why it cannot be used.
        reason: String,
    },
}

impl From<ParseValueTypeError> for CopyError {
    fn from(err: ParseValueTypeError) -> Self {
        CopyError::UnsupportedValueType { value: err.value }
    }
}

/// Result type for write operations.
pub type CopyResult<T> = Result<T, CopyError>;

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "transmart-output";

/// Maximum length of an ontology path (`c_fullname`) in i2b2.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 700;

/// Environment variable overriding the output directory.
pub const OUTPUT_DIR_ENV: &str = "TRANSMART_OUTPUT_DIR";

/// Environment variable overriding the path length warning threshold.
pub const MAX_PATH_LENGTH_ENV: &str = "TRANSMART_MAX_PATH_LENGTH";

/// Configuration for writing a collection.
#[derive(Debug, Clone)]
pub struct CopyConfig {
    /// Directory the tables are written to. Must be absent or empty.
    pub output_dir: PathBuf,
    /// Ontology paths longer than this are written with a warning.
    pub max_path_length: usize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
        }
    }
}

impl CopyConfig {
    /// Creates a config writing to the given directory.
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Sets the path length warning threshold.
    pub fn with_max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    /// Creates a config from `TRANSMART_OUTPUT_DIR` and
    /// `TRANSMART_MAX_PATH_LENGTH`, falling back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(value) = std::env::var(MAX_PATH_LENGTH_ENV) {
            match value.parse() {
                Ok(length) => config.max_path_length = length,
                Err(_) => tracing::warn!(
                    "Ignoring invalid {}={}, using {}",
                    MAX_PATH_LENGTH_ENV,
                    value,
                    DEFAULT_MAX_PATH_LENGTH
                ),
            }
        }
        config
    }
}

/// Statistics from writing a collection.
#[derive(Debug, Clone, Default)]
pub struct WriteStats {
    /// Data rows written per table, header rows excluded.
    pub rows: [usize; Table::COUNT],
    /// Ontology nodes skipped because they carry no loadable fact.
    pub skipped_nodes: usize,
    /// Ontology paths written despite exceeding the length threshold.
    pub long_paths: usize,
    /// Observations written (each may produce several rows).
    pub observations: usize,
    /// Time taken to write in milliseconds.
    pub write_time_ms: u64,
}

impl WriteStats {
    /// Returns the number of data rows written to a table.
    pub fn rows(&self, table: Table) -> usize {
        self.rows[table.index()]
    }

    /// Returns the total number of data rows written.
    pub fn total_rows(&self) -> usize {
        self.rows.iter().sum()
    }

    pub(crate) fn record_row(&mut self, table: Table) {
        self.rows[table.index()] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_config_default() {
        let config = CopyConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("transmart-output"));
        assert_eq!(config.max_path_length, 700);
    }

    #[test]
    fn test_copy_config_builder() {
        let config = CopyConfig::new("/tmp/out").with_max_path_length(100);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.max_path_length, 100);
    }

    #[test]
    fn test_write_stats_counts() {
        let mut stats = WriteStats::default();
        stats.record_row(Table::Patients);
        stats.record_row(Table::PatientMappings);
        stats.record_row(Table::PatientMappings);

        assert_eq!(stats.rows(Table::Patients), 1);
        assert_eq!(stats.rows(Table::PatientMappings), 2);
        assert_eq!(stats.rows(Table::Observations), 0);
        assert_eq!(stats.total_rows(), 3);
    }

    #[test]
    fn test_error_messages() {
        let err = CopyError::StructuralInvalid {
            errors: vec![
                "Node A is not a root node".to_string(),
                "Node B is not a root node".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid collection: Node A is not a root node; Node B is not a root node"
        );

        let err = CopyError::UnresolvedReference {
            kind: "patient",
            key: "SUBJ9".to_string(),
        };
        assert_eq!(err.to_string(), "Unresolved patient reference: SUBJ9");

        let err: CopyError = "Blob".parse::<transmart_types::ValueType>().unwrap_err().into();
        assert!(matches!(err, CopyError::UnsupportedValueType { ref value } if value == "Blob"));
    }
}
