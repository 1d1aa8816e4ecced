//! Dataset-level checks.
//!
//! This module handles the checks that look at the row-set as a whole:
//! - Index: row positions within the schema's bounds
//! - Uniqueness: no two rows share values across the composite column set
//!
//! Both run after coercion, so `"3"` and `3` in an int column collide.

use crate::schema::to_text;
use etl_core::{Check, DataValue, IndexRange, RowSet, TableSchema, ValidationReport, Violation};
use std::collections::HashMap;

/// Validates dataset-wide constraints.
#[derive(Debug, Default)]
pub struct QualityValidator;

impl QualityValidator {
    /// Creates a new quality validator.
    pub fn new() -> Self {
        Self
    }

    /// Runs the index and uniqueness checks of a schema.
    pub fn validate(&self, schema: &TableSchema, rowset: &RowSet, report: &mut ValidationReport) {
        if let Some(index) = &schema.index {
            self.check_index(index, rowset, report);
        }

        if !schema.unique.is_empty() {
            // a missing column is already reported; grouping on it would flag every row
            if schema.unique.iter().all(|c| rowset.has_column(c)) {
                self.check_uniqueness(&schema.unique, rowset, report);
            }
        }
    }

    /// Reports every row position outside the index bounds.
    pub fn check_index(&self, index: &IndexRange, rowset: &RowSet, report: &mut ValidationReport) {
        for position in (0..rowset.len()).filter(|p| !index.contains(*p)) {
            report.add(Violation::row(
                position,
                Check::IndexInRange {
                    min: index.min,
                    max: index.max,
                },
                DataValue::Int(position as i64),
            ));
        }
    }

    /// Reports every member of every group of rows sharing the same values
    /// across `columns`. Nulls compare equal.
    pub fn check_uniqueness(&self, columns: &[String], rowset: &RowSet, report: &mut ValidationReport) {
        let keys: Vec<String> = (0..rowset.len())
            .map(|position| composite_key(columns, rowset, position))
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for key in &keys {
            *counts.entry(key.as_str()).or_default() += 1;
        }

        for (position, key) in keys.iter().enumerate() {
            if counts.get(key.as_str()).copied().unwrap_or(0) > 1 {
                let observed = columns
                    .iter()
                    .map(|c| rowset.value(position, c).to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                report.add(Violation::row(
                    position,
                    Check::Unique {
                        columns: columns.to_vec(),
                    },
                    DataValue::String(observed),
                ));
            }
        }
    }
}

/// Builds a key that only collides for rows with equal typed values.
///
/// Each part is tagged with its type and length-prefixed, so no choice of
/// string content can make two different tuples render the same.
fn composite_key(columns: &[String], rowset: &RowSet, position: usize) -> String {
    let mut key = String::new();
    for column in columns {
        let value = rowset.value(position, column);
        let text = to_text(value);
        key.push_str(value.type_name());
        key.push(':');
        key.push_str(&text.len().to_string());
        key.push(':');
        key.push_str(&text);
        key.push('|');
    }
    key
}
