//! Proof that a row-set passed a schema.

use crate::ValidationError;
use etl_core::RowSet;

/// A row-set that passed validation, tagged with the schema it passed.
///
/// Only [`DataValidator`](crate::DataValidator) can build one, so holding a
/// `Validated` means every declared constraint held when it was checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    schema: String,
    columns: Vec<String>,
    rows: RowSet,
}

impl Validated {
    pub(crate) fn new(schema: impl Into<String>, columns: Vec<String>, rows: RowSet) -> Self {
        Self {
            schema: schema.into(),
            columns,
            rows,
        }
    }

    /// Name of the schema the rows passed.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Columns declared by that schema.
    pub fn declared_columns(&self) -> &[String] {
        &self.columns
    }

    /// The validated rows, with coercions applied.
    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    /// Unwraps the rows, dropping the tag.
    pub fn into_rows(self) -> RowSet {
        self.rows
    }

    /// Fails unless the schema declared every one of `columns`.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), ValidationError> {
        let missing: Vec<String> = columns
            .iter()
            .filter(|c| !self.columns.iter().any(|d| d == *c))
            .map(|c| c.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingDeclaredColumns {
                schema: self.schema.clone(),
                missing,
            })
        }
    }

    /// Fails unless the rows passed the named schema.
    pub fn expect_schema(&self, name: &str) -> Result<(), ValidationError> {
        if self.schema == name {
            Ok(())
        } else {
            Err(ValidationError::schema_mismatch(name, &self.schema))
        }
    }
}
