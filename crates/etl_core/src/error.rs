//! Error types for schema definitions.
//!
//! A malformed schema is a configuration fault. It is reported here, before any
//! data is looked at, and never shows up as a data violation.

use thiserror::Error;

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors in the definition of a [`TableSchema`](crate::TableSchema).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Schema declares no fields at all
    #[error("Schema '{0}' has no fields defined")]
    NoFields(String),

    /// Two fields share a name
    #[error("Duplicate field name '{field}' in schema '{schema}'")]
    DuplicateField {
        /// Schema name
        schema: String,
        /// Repeated field name
        field: String,
    },

    /// The uniqueness set names a column the schema does not declare
    #[error("Uniqueness column '{column}' is not declared in schema '{schema}'")]
    UnknownUniqueColumn {
        /// Schema name
        schema: String,
        /// Undeclared column
        column: String,
    },

    /// A range or length constraint has min greater than max
    #[error("Invalid range for field '{field}': min {min} is greater than max {max}")]
    InvalidRange {
        /// Field name
        field: String,
        /// Lower bound as written
        min: String,
        /// Upper bound as written
        max: String,
    },

    /// A pattern constraint does not compile
    #[error("Invalid regex pattern for field '{field}': {error}")]
    InvalidRegex {
        /// Field name
        field: String,
        /// Compiler message
        error: String,
    },

    /// A constraint was attached to a column type it cannot apply to
    #[error("Constraint '{constraint}' does not apply to {column_type} field '{field}'")]
    InapplicableConstraint {
        /// Field name
        field: String,
        /// Constraint kind
        constraint: String,
        /// Declared column type
        column_type: String,
    },

    /// Type name not recognised
    #[error("Unknown column type: {0}")]
    UnknownType(String),
}

impl SchemaError {
    /// Creates a duplicate field error.
    pub fn duplicate_field(schema: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            schema: schema.into(),
            field: field.into(),
        }
    }

    /// Creates an invalid range error.
    pub fn invalid_range(
        field: impl Into<String>,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::InvalidRange {
            field: field.into(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Creates an inapplicable constraint error.
    pub fn inapplicable(
        field: impl Into<String>,
        constraint: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Self {
        Self::InapplicableConstraint {
            field: field.into(),
            constraint: constraint.into(),
            column_type: column_type.into(),
        }
    }
}
