//! Table schema types.
//!
//! A [`TableSchema`] is plain configuration data: per-column [`FieldSpec`]s plus
//! dataset-level options (coercion default, strictness, composite uniqueness,
//! index bounds). One generic validator consumes any schema value; schemas for
//! later pipeline stages are built by composition with [`TableSchema::extend`].

use crate::{DataValue, Result, SchemaError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Scalar type a column must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// 64-bit signed integer
    #[serde(rename = "int64", alias = "int", alias = "integer", alias = "long")]
    Int,
    /// 64-bit float
    #[serde(rename = "float64", alias = "float", alias = "double")]
    Float,
    /// UTF-8 string
    #[serde(rename = "string", alias = "str", alias = "text")]
    String,
    /// Boolean
    #[serde(rename = "bool", alias = "boolean")]
    Bool,
}

impl ColumnType {
    /// Returns the canonical type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "int64",
            ColumnType::Float => "float64",
            ColumnType::String => "string",
            ColumnType::Bool => "bool",
        }
    }

    /// Returns true if the value already has this type. Null never matches.
    pub fn matches(&self, value: &DataValue) -> bool {
        matches!(
            (self, value),
            (ColumnType::Int, DataValue::Int(_))
                | (ColumnType::Float, DataValue::Float(_))
                | (ColumnType::String, DataValue::String(_))
                | (ColumnType::Bool, DataValue::Bool(_))
        )
    }

    /// Returns true for integer and float columns.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "int64" | "int" | "integer" | "long" => Ok(ColumnType::Int),
            "float64" | "float" | "double" => Ok(ColumnType::Float),
            "string" | "str" | "text" => Ok(ColumnType::String),
            "bool" | "boolean" => Ok(ColumnType::Bool),
            other => Err(SchemaError::UnknownType(other.to_string())),
        }
    }
}

/// Validation constraints that can be applied to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldConstraint {
    /// Numeric value must be within the inclusive range; either bound may be open
    Range {
        /// Minimum value (inclusive)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Maximum value (inclusive)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },

    /// String length (in characters) must be within the inclusive range
    Length {
        /// Minimum length (inclusive)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        /// Maximum length (inclusive)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },

    /// Value must be one of the listed values (compared as text)
    AllowedValues {
        /// List of valid values
        values: Vec<String>,
    },

    /// String value must match the regular expression at its start
    Pattern {
        /// Regular expression pattern
        regex: String,
    },
}

impl FieldConstraint {
    /// Short name of the constraint kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldConstraint::Range { .. } => "range",
            FieldConstraint::Length { .. } => "length",
            FieldConstraint::AllowedValues { .. } => "allowed_values",
            FieldConstraint::Pattern { .. } => "pattern",
        }
    }

    fn applies_to(&self, column_type: ColumnType) -> bool {
        match self {
            FieldConstraint::Range { .. } => column_type.is_numeric(),
            FieldConstraint::Length { .. } | FieldConstraint::Pattern { .. } => {
                column_type == ColumnType::String
            }
            FieldConstraint::AllowedValues { .. } => true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// A single column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name
    pub name: String,

    /// Declared scalar type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Whether the column may contain nulls
    #[serde(default)]
    pub nullable: bool,

    /// Whether the column must be present in the row-set
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub required: bool,

    /// Per-column override of the schema's coercion setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coerce: Option<bool>,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Value constraints, checked after coercion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<FieldConstraint>,
}

impl FieldSpec {
    /// Returns whether values of this column are coerced, given the schema default.
    pub fn coerces(&self, schema_default: bool) -> bool {
        self.coerce.unwrap_or(schema_default)
    }
}

/// Inclusive bounds on row positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    /// Lowest admissible position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Highest admissible position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

impl IndexRange {
    /// Creates a closed range.
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Returns true if the position is within the bounds.
    pub fn contains(&self, position: usize) -> bool {
        self.min.is_none_or(|min| position >= min) && self.max.is_none_or(|max| position <= max)
    }
}

/// Declarative schema for a row-set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Schema name, carried by validated row-sets and reports
    pub name: String,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cast values to the declared type before checking constraints
    #[serde(default)]
    pub coerce: bool,

    /// Reject row-sets carrying columns the schema does not declare
    #[serde(default)]
    pub strict: bool,

    /// Columns whose combined values must be unique across rows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique: Vec<String>,

    /// Bounds on row positions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexRange>,

    /// Column definitions
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl TableSchema {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the declared column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Builds a new schema from this one plus additional fields.
    ///
    /// Dataset-level options are inherited. A field whose name is already
    /// declared is rejected rather than overridden, so every constraint of
    /// `self` survives unchanged in the result.
    pub fn extend(&self, name: impl Into<String>, fields: Vec<FieldSpec>) -> Result<TableSchema> {
        let name = name.into();
        let mut extended = self.clone();
        for field in fields {
            if extended.field(&field.name).is_some() {
                return Err(SchemaError::duplicate_field(name, field.name));
            }
            extended.fields.push(field);
        }
        extended.name = name;
        Ok(extended)
    }

    /// Returns true if every field of `other` is declared here with identical
    /// type and constraints.
    pub fn covers(&self, other: &TableSchema) -> bool {
        other
            .fields
            .iter()
            .all(|theirs| self.field(&theirs.name) == Some(theirs))
    }

    /// Checks that the schema itself is well formed.
    ///
    /// Returns the first problem found: no fields, duplicate names,
    /// undeclared uniqueness columns, inverted ranges, constraints that do
    /// not apply to the column type, or patterns that do not compile.
    pub fn check_definition(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::duplicate_field(&self.name, &field.name));
            }
            check_field(field)?;
        }

        if let Some(column) = self.unique.iter().find(|c| !seen.contains(c.as_str())) {
            return Err(SchemaError::UnknownUniqueColumn {
                schema: self.name.clone(),
                column: column.clone(),
            });
        }

        if let Some(IndexRange {
            min: Some(min),
            max: Some(max),
        }) = self.index
        {
            if min > max {
                return Err(SchemaError::invalid_range("index", min, max));
            }
        }

        Ok(())
    }
}

fn check_field(field: &FieldSpec) -> Result<()> {
    for constraint in &field.constraints {
        if !constraint.applies_to(field.column_type) {
            return Err(SchemaError::inapplicable(
                &field.name,
                constraint.kind(),
                field.column_type.as_str(),
            ));
        }

        match constraint {
            FieldConstraint::Range {
                min: Some(min),
                max: Some(max),
            } if min > max => return Err(SchemaError::invalid_range(&field.name, min, max)),
            FieldConstraint::Length {
                min: Some(min),
                max: Some(max),
            } if min > max => return Err(SchemaError::invalid_range(&field.name, min, max)),
            FieldConstraint::Pattern { regex } => {
                Regex::new(regex).map_err(|e| SchemaError::InvalidRegex {
                    field: field.name.clone(),
                    error: e.to_string(),
                })?;
            }
            _ => {}
        }
    }
    Ok(())
}
