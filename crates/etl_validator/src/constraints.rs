//! Constraint validation logic.
//!
//! This module handles the value constraints of a field:
//! - Range: numeric value within inclusive bounds
//! - Length: string length (in characters) within inclusive bounds
//! - AllowedValues: value is one of a predefined set
//! - Pattern: string value matches a regex at its start
//!
//! Constraints are only checked on non-null values already of the declared
//! type; nullability and types are the schema validator's job.

use crate::{ValidationError, schema::to_text};
use etl_core::{Check, DataValue, FieldConstraint, FieldSpec, SchemaError, TableSchema, ValidationReport, Violation};
use regex::Regex;
use std::collections::HashMap;

/// Validates field constraints cell by cell.
#[derive(Debug)]
pub struct ConstraintValidator {
    /// Compiled patterns, keyed by their source text
    regex_cache: HashMap<String, Regex>,
}

impl ConstraintValidator {
    /// Creates a constraint validator, compiling every pattern of the schema.
    pub fn new(schema: &TableSchema) -> Result<Self, ValidationError> {
        let mut regex_cache = HashMap::new();
        for field in &schema.fields {
            for constraint in &field.constraints {
                if let FieldConstraint::Pattern { regex } = constraint {
                    if regex_cache.contains_key(regex) {
                        continue;
                    }
                    // anchor at the start, like a match rather than a search
                    let compiled = Regex::new(&format!("^(?:{regex})")).map_err(|e| {
                        SchemaError::InvalidRegex {
                            field: field.name.clone(),
                            error: e.to_string(),
                        }
                    })?;
                    regex_cache.insert(regex.clone(), compiled);
                }
            }
        }
        Ok(Self { regex_cache })
    }

    /// Checks every constraint of a field against one value.
    ///
    /// Returns the number of constraints evaluated.
    pub fn check(
        &self,
        field: &FieldSpec,
        value: &DataValue,
        position: usize,
        report: &mut ValidationReport,
    ) -> usize {
        if value.is_null() {
            return 0;
        }

        for constraint in &field.constraints {
            if self.satisfies(constraint, value) == Some(false) {
                report.add(Violation::cell(
                    position,
                    &field.name,
                    Check::from(constraint),
                    value.clone(),
                ));
            }
        }
        field.constraints.len()
    }

    /// Returns whether the value satisfies the constraint, or `None` if the
    /// constraint does not apply to a value of this type.
    fn satisfies(&self, constraint: &FieldConstraint, value: &DataValue) -> Option<bool> {
        match constraint {
            FieldConstraint::Range { min, max } => {
                let n = value.as_float()?;
                Some(!n.is_nan() && min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max))
            }
            FieldConstraint::Length { min, max } => {
                let len = value.as_str()?.chars().count();
                Some(min.is_none_or(|min| len >= min) && max.is_none_or(|max| len <= max))
            }
            FieldConstraint::AllowedValues { values } => {
                let text = to_text(value);
                Some(values.iter().any(|v| *v == text))
            }
            FieldConstraint::Pattern { regex } => {
                let s = value.as_str()?;
                Some(self.regex_cache.get(regex).is_some_and(|re| re.is_match(s)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_core::{ColumnType, FieldBuilder, SchemaBuilder};
    use pretty_assertions::assert_eq;

    fn run(field: FieldSpec, value: DataValue) -> Vec<Check> {
        let schema = SchemaBuilder::new("s").field(field.clone()).build();
        let validator = ConstraintValidator::new(&schema).unwrap();
        let mut report = ValidationReport::new("s");
        validator.check(&field, &value, 0, &mut report);
        report.violations.into_iter().map(|v| v.check).collect()
    }

    #[test]
    fn test_range_is_inclusive() {
        let field = FieldBuilder::new("q", ColumnType::Int).in_range(20.0, 200.0).build();
        assert!(run(field.clone(), DataValue::Int(20)).is_empty());
        assert!(run(field.clone(), DataValue::Int(200)).is_empty());
        assert_eq!(
            run(field, DataValue::Int(201)),
            vec![Check::Range {
                min: Some(20.0),
                max: Some(200.0)
            }]
        );
    }

    #[test]
    fn test_open_range() {
        let field = FieldBuilder::new("q", ColumnType::Float).min(0.0).build();
        assert!(run(field.clone(), DataValue::Float(1e12)).is_empty());
        assert_eq!(run(field, DataValue::Float(-0.5)).len(), 1);
    }

    #[test]
    fn test_length_counts_characters() {
        let field = FieldBuilder::new("s", ColumnType::String)
            .length(Some(2), Some(3))
            .build();
        assert!(run(field.clone(), "héé".into()).is_empty());
        assert_eq!(run(field.clone(), "h".into()).len(), 1);
        assert_eq!(run(field, "hello".into()).len(), 1);
    }

    #[test]
    fn test_allowed_values_compare_as_text() {
        let field = FieldBuilder::new("code", ColumnType::Int)
            .allowed_values(["1", "2"])
            .build();
        assert!(run(field.clone(), DataValue::Int(2)).is_empty());
        assert_eq!(run(field, DataValue::Int(3)).len(), 1);
    }

    #[test]
    fn test_pattern_matches_at_start() {
        let field = FieldBuilder::new("email", ColumnType::String)
            .pattern(r"[^@]+@[^@]+\.[^@]+")
            .build();
        assert!(run(field.clone(), "a@b.com".into()).is_empty());
        assert!(run(field.clone(), "a@b.com trailing".into()).is_empty());
        assert_eq!(
            run(field, "not-an-email".into()),
            vec![Check::Pattern {
                regex: r"[^@]+@[^@]+\.[^@]+".to_string()
            }]
        );

        let lower = FieldBuilder::new("c", ColumnType::String)
            .pattern(r"[a-z]+")
            .build();
        assert_eq!(run(lower, "Abc".into()).len(), 1);
    }

    #[test]
    fn test_null_skips_constraints() {
        let field = FieldBuilder::new("q", ColumnType::Int).min(0.0).build();
        assert!(run(field, DataValue::Null).is_empty());
    }

    #[test]
    fn test_invalid_regex_is_definition_error() {
        let schema = SchemaBuilder::new("s")
            .field(
                FieldBuilder::new("e", ColumnType::String)
                    .pattern("(unclosed")
                    .build(),
            )
            .build();
        assert!(matches!(
            ConstraintValidator::new(&schema),
            Err(ValidationError::Definition(SchemaError::InvalidRegex { .. }))
        ));
    }
}
