//! Error types for validation operations.
//!
//! Data violations are not errors: they are collected into a
//! [`ValidationReport`](etl_core::ValidationReport). The errors here are
//! configuration faults and failed tag assertions.

use etl_core::SchemaError;
use thiserror::Error;

/// Errors that can occur when building a validator or trusting its output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The schema itself is malformed
    #[error("Invalid schema definition: {0}")]
    Definition(#[from] SchemaError),

    /// A validated row-set carries a different schema tag than expected
    #[error("Row-set was validated against schema '{actual}', expected '{expected}'")]
    SchemaMismatch {
        /// Schema the consumer requires
        expected: String,
        /// Schema the row-set was validated against
        actual: String,
    },

    /// The schema a row-set was validated against does not declare some columns
    #[error("Schema '{schema}' does not declare required column(s): {}", .missing.join(", "))]
    MissingDeclaredColumns {
        /// Schema the row-set was validated against
        schema: String,
        /// Columns the consumer needs but the schema does not declare
        missing: Vec<String>,
    },
}

impl ValidationError {
    /// Creates a schema mismatch error.
    pub fn schema_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
