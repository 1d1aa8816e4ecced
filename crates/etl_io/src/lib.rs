//! Source and sink plumbing for the bronze product ETL.
//!
//! This crate provides the boundaries of the pipeline:
//!
//! - [`SettingsLoader`]: connection parameters from the environment and `.env`
//! - [`RowSource`]: runs a query and returns a [`RowSet`](etl_core::RowSet)
//!   (`PostgresSource` behind the `postgres` feature, [`MemorySource`] always)
//! - [`TableSink`]: replaces a named table with a row-set
//!   (`DuckDbSink` behind the `duckdb` feature, [`MemorySink`] always)
//!
//! # Example
//!
//! ```no_run
//! use etl_io::{DuckDbSink, EnvSettingsLoader, PostgresSource, RowSource, SettingsLoader, TableSink};
//!
//! # fn example() -> Result<(), etl_io::IoError> {
//! let settings = EnvSettingsLoader::new().load();
//! let rows = PostgresSource::new().query("SELECT * FROM products_bronze", &settings)?;
//!
//! let mut sink = DuckDbSink::new("my_duckdb.db");
//! sink.replace_table("table_kpi", &rows)?;
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod config;
mod converter;
mod sink;
mod source;

pub use config::{ConnectionSettings, EnvSettingsLoader, SettingsLoader};
pub use converter::column_sql_type;
pub use sink::{DEFAULT_DATABASE, MemorySink, TableSink};
pub use source::{MemorySource, RowSource};

#[cfg(feature = "duckdb")]
pub use sink::DuckDbSink;
#[cfg(feature = "postgres")]
pub use source::PostgresSource;

/// Error types for source and sink operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IoError {
    /// Failed to connect to the source database
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String),

    /// The query was rejected or failed while running
    #[error("Query failed: {0}")]
    QueryError(String),

    /// A value returned by the source could not be decoded
    #[error("Failed to decode column '{column}' value '{value}' as {expected}")]
    ConversionError {
        /// Column name
        column: String,
        /// Raw value as text
        value: String,
        /// Type the column declared
        expected: String,
    },

    /// Writing to the sink failed
    #[error("Failed to write table: {0}")]
    SinkError(String),
}

impl IoError {
    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError(message.into())
    }

    /// Creates a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError(message.into())
    }

    /// Creates a sink error.
    pub fn sink(message: impl Into<String>) -> Self {
        Self::SinkError(message.into())
    }
}

#[cfg(feature = "duckdb")]
impl From<duckdb::Error> for IoError {
    fn from(err: duckdb::Error) -> Self {
        IoError::SinkError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IoError::connection("connection refused");
        assert_eq!(
            err.to_string(),
            "Failed to connect to database: connection refused"
        );

        let err = IoError::ConversionError {
            column: "quantity".to_string(),
            value: "abc".to_string(),
            expected: "int8".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to decode column 'quantity' value 'abc' as int8"
        );
    }
}
