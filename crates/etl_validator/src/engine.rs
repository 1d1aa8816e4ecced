//! Main validation engine.
//!
//! This module provides the `DataValidator` that runs the structure, cell and
//! dataset checks of one schema and either tags the row-set as validated or
//! returns the full report.

use crate::{ConstraintValidator, QualityValidator, SchemaValidator, Validated, ValidationError};
use etl_core::{DataValue, RowSet, TableSchema, ValidationReport, ValidationStats, Violation, Check};
use std::time::Instant;
use tracing::debug;

/// Validation engine for one schema.
///
/// Building the validator checks the schema definition and compiles its
/// patterns once; the validator can then check any number of row-sets.
///
/// # Example
///
/// ```rust
/// use etl_core::{ColumnType, DataValue, FieldBuilder, RowSet, SchemaBuilder};
/// use etl_validator::DataValidator;
///
/// let schema = SchemaBuilder::new("people")
///     .field(FieldBuilder::new("age", ColumnType::Int).in_range(0.0, 150.0).build())
///     .build();
/// let validator = DataValidator::new(&schema).unwrap();
///
/// let rows = RowSet::from_columns(vec![("age", vec![DataValue::Int(200)])]);
/// match validator.validate(rows) {
///     Ok(validated) => println!("{} rows passed", validated.rows().len()),
///     Err(report) => println!("{report}"),
/// }
/// ```
#[derive(Debug)]
pub struct DataValidator {
    schema: TableSchema,
    schema_validator: SchemaValidator,
    constraint_validator: ConstraintValidator,
    quality_validator: QualityValidator,
}

impl DataValidator {
    /// Creates a validator for a schema.
    ///
    /// Fails if the schema definition is malformed.
    pub fn new(schema: &TableSchema) -> Result<Self, ValidationError> {
        schema.check_definition()?;
        Ok(Self {
            schema: schema.clone(),
            schema_validator: SchemaValidator::new(),
            constraint_validator: ConstraintValidator::new(schema)?,
            quality_validator: QualityValidator::new(),
        })
    }

    /// Returns the schema this validator checks.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Validates a row-set.
    ///
    /// Coercions are applied in place. On success the row-set comes back
    /// tagged with the schema; otherwise the report lists every violation.
    pub fn validate(&self, mut rowset: RowSet) -> Result<Validated, ValidationReport> {
        let start = Instant::now();
        let schema = &self.schema;
        let mut report = ValidationReport::new(&schema.name);
        let mut cells_checked = 0;

        // 1. Column layout
        self.schema_validator.check_columns(schema, &rowset, &mut report);

        // 2. Cells: nullability, type, constraints
        let present: Vec<bool> = schema
            .fields
            .iter()
            .map(|f| rowset.has_column(&f.name))
            .collect();
        for (position, row) in rowset.rows_mut().enumerate() {
            for (field, _) in schema.fields.iter().zip(&present).filter(|(_, p)| **p) {
                cells_checked += 1;
                let Some(value) = row.get_mut(&field.name) else {
                    // absent cell in a present column reads as null
                    if !field.nullable {
                        report.add(Violation::cell(
                            position,
                            &field.name,
                            Check::NotNullable,
                            DataValue::Null,
                        ));
                    }
                    continue;
                };
                let coerce = field.coerces(schema.coerce);
                if self
                    .schema_validator
                    .check_cell(field, coerce, value, position, &mut report)
                {
                    self.constraint_validator
                        .check(field, value, position, &mut report);
                }
            }
        }

        // 3. Dataset: index bounds, uniqueness
        self.quality_validator.validate(schema, &rowset, &mut report);

        let columns = rowset.columns().to_vec();
        for position in report.failing_row_positions() {
            if let Some(row) = rowset.get_row(position) {
                report.record_row(position, row, &columns);
            }
        }

        report.stats = ValidationStats {
            rows_checked: rowset.len(),
            columns_checked: schema.fields.len(),
            cells_checked,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            schema = %schema.name,
            rows = report.stats.rows_checked,
            cells = report.stats.cells_checked,
            violations = report.len(),
            duration_ms = report.stats.duration_ms,
            "Validation finished"
        );

        if report.is_empty() {
            let declared = schema.fields.iter().map(|f| f.name.clone()).collect();
            Ok(Validated::new(&schema.name, declared, rowset))
        } else {
            Err(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_core::{ColumnType, FieldBuilder, SchemaBuilder, SchemaError};
    use pretty_assertions::assert_eq;

    fn schema() -> TableSchema {
        SchemaBuilder::new("test")
            .coerce(true)
            .field(FieldBuilder::new("id", ColumnType::Int).in_range(1.0, 10.0).build())
            .field(FieldBuilder::new("name", ColumnType::String).build())
            .build()
    }

    #[test]
    fn test_empty_rowset_with_columns_passes() {
        let validator = DataValidator::new(&schema()).unwrap();
        let validated = validator
            .validate(RowSet::with_columns(["id", "name"]))
            .unwrap();
        assert!(validated.rows().is_empty());
        assert_eq!(validated.schema_name(), "test");
    }

    #[test]
    fn test_valid_data_is_coerced() {
        let validator = DataValidator::new(&schema()).unwrap();
        let rows = RowSet::from_columns(vec![
            ("id", vec!["3".into(), DataValue::Float(4.0)]),
            ("name", vec![DataValue::Int(7), "b".into()]),
        ]);

        let validated = validator.validate(rows).unwrap();
        let rows = validated.rows();
        assert_eq!(rows.value(0, "id"), &DataValue::Int(3));
        assert_eq!(rows.value(1, "id"), &DataValue::Int(4));
        assert_eq!(rows.value(0, "name"), &DataValue::from("7"));
        assert_eq!(validated.declared_columns(), &["id".to_string(), "name".to_string()]);
    }

    #[test]
    fn test_failed_coercion_skips_constraints() {
        let validator = DataValidator::new(&schema()).unwrap();
        let rows = RowSet::from_columns(vec![
            ("id", vec!["abc".into()]),
            ("name", vec!["a".into()]),
        ]);

        let report = validator.validate(rows).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.violations[0].check,
            Check::CoerceDtype {
                expected: ColumnType::Int
            }
        );
        assert_eq!(report.violations[0].observed, DataValue::from("abc"));
    }

    #[test]
    fn test_absent_cell_reads_as_null() {
        let validator = DataValidator::new(&schema()).unwrap();
        let mut full = etl_core::DataRow::new();
        full.insert("id".to_string(), DataValue::Int(1));
        full.insert("name".to_string(), "a".into());
        let mut partial = etl_core::DataRow::new();
        partial.insert("id".to_string(), DataValue::Int(2));

        let report = validator
            .validate(RowSet::from_rows(vec![full, partial]))
            .unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].row, Some(1));
        assert_eq!(report.violations[0].check, Check::NotNullable);
    }

    #[test]
    fn test_report_collects_every_violation() {
        let validator = DataValidator::new(&schema()).unwrap();
        let rows = RowSet::from_columns(vec![
            ("id", vec![0.into(), 5.into(), 11.into()]),
            ("name", vec![DataValue::Null, "ok".into(), "x".into()]),
        ]);

        let report = validator.validate(rows).unwrap_err();
        assert_eq!(report.len(), 3);
        assert_eq!(report.failing_row_positions(), vec![0, 2]);
        assert_eq!(report.stats.rows_checked, 3);
        assert_eq!(report.stats.cells_checked, 6);
        assert_eq!(report.failing_rows().len(), 2);
    }

    #[test]
    fn test_invalid_definition_is_rejected() {
        let bad = SchemaBuilder::new("bad")
            .unique(["ghost"])
            .field(FieldBuilder::new("id", ColumnType::Int).build())
            .build();
        assert_eq!(
            DataValidator::new(&bad).unwrap_err(),
            ValidationError::Definition(SchemaError::UnknownUniqueColumn {
                schema: "bad".to_string(),
                column: "ghost".to_string(),
            })
        );
    }
}
