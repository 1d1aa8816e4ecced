//! Structure, nullability and type checks.
//!
//! This module checks the column layout of a row-set against a schema and the
//! nullability and type of every declared cell, casting values to the declared
//! type when coercion is enabled.

use etl_core::{Check, ColumnType, DataValue, FieldSpec, RowSet, TableSchema, ValidationReport, Violation};
use std::collections::HashSet;

/// Validates the column layout and cell types of a row-set.
#[derive(Debug, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Creates a new schema validator.
    pub fn new() -> Self {
        Self
    }

    /// Reports missing required columns and, for strict schemas, columns
    /// the schema does not declare.
    pub fn check_columns(&self, schema: &TableSchema, rowset: &RowSet, report: &mut ValidationReport) {
        for field in &schema.fields {
            if field.required && !rowset.has_column(&field.name) {
                report.add(Violation::column(&field.name, Check::ColumnInDataframe));
            }
        }

        if schema.strict {
            let declared: HashSet<&str> = schema.column_names().into_iter().collect();
            for extra in rowset.extra_columns(&declared) {
                report.add(Violation::column(extra, Check::ColumnInSchema));
            }
        }
    }

    /// Checks one cell's nullability and type, coercing it in place when
    /// `coerce` is set.
    ///
    /// Returns true if the cell holds a non-null value of the declared type
    /// and its value constraints should be checked.
    pub fn check_cell(
        &self,
        field: &FieldSpec,
        coerce: bool,
        value: &mut DataValue,
        position: usize,
        report: &mut ValidationReport,
    ) -> bool {
        if value.is_null() {
            if !field.nullable {
                report.add(Violation::cell(
                    position,
                    &field.name,
                    Check::NotNullable,
                    DataValue::Null,
                ));
            }
            return false;
        }

        if field.column_type.matches(value) {
            return true;
        }

        if !coerce {
            report.add(Violation::cell(
                position,
                &field.name,
                Check::Dtype {
                    expected: field.column_type,
                },
                value.clone(),
            ));
            return false;
        }

        match coerce_value(value, field.column_type) {
            Some(cast) => {
                *value = cast;
                true
            }
            None => {
                report.add(Violation::cell(
                    position,
                    &field.name,
                    Check::CoerceDtype {
                        expected: field.column_type,
                    },
                    value.clone(),
                ));
                false
            }
        }
    }
}

/// Casts a value to the target type.
///
/// Returns `None` if the value cannot be represented in the target type
/// without losing information. Null is returned unchanged.
pub fn coerce_value(value: &DataValue, target: ColumnType) -> Option<DataValue> {
    if value.is_null() || target.matches(value) {
        return Some(value.clone());
    }

    match target {
        ColumnType::Int => to_int(value).map(DataValue::Int),
        ColumnType::Float => to_float(value).map(DataValue::Float),
        ColumnType::String => Some(DataValue::String(to_text(value))),
        ColumnType::Bool => to_bool(value).map(DataValue::Bool),
    }
}

fn to_int(value: &DataValue) -> Option<i64> {
    match value {
        DataValue::Int(i) => Some(*i),
        DataValue::Float(f) => integral(*f),
        DataValue::Bool(b) => Some(i64::from(*b)),
        DataValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        DataValue::Null => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn to_float(value: &DataValue) -> Option<f64> {
    match value {
        DataValue::Float(f) => Some(*f),
        DataValue::Int(i) => Some(*i as f64),
        DataValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        DataValue::String(s) => s.trim().parse::<f64>().ok(),
        DataValue::Null => None,
    }
}

fn to_bool(value: &DataValue) -> Option<bool> {
    match value {
        DataValue::Bool(b) => Some(*b),
        DataValue::Int(0) => Some(false),
        DataValue::Int(1) => Some(true),
        DataValue::Float(f) if *f == 0.0 => Some(false),
        DataValue::Float(f) if *f == 1.0 => Some(true),
        DataValue::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Some(true),
            "false" | "f" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Renders a non-null value as plain text, without the quoting used in reports.
pub(crate) fn to_text(value: &DataValue) -> String {
    match value {
        DataValue::String(s) => s.clone(),
        DataValue::Float(f) => format!("{f:?}"),
        DataValue::Int(i) => i.to_string(),
        DataValue::Bool(b) => b.to_string(),
        DataValue::Null => String::new(),
    }
}
