//! Builder pattern for declaring schemas in code.
//!
//! This module provides fluent builders for [`TableSchema`] and [`FieldSpec`].

use crate::{ColumnType, FieldConstraint, FieldSpec, IndexRange, TableSchema};

/// Builder for creating a `TableSchema`.
///
/// # Example
///
/// ```rust
/// use etl_core::{ColumnType, FieldBuilder, SchemaBuilder};
///
/// let schema = SchemaBuilder::new("products_raw")
///     .description("Bronze product rows")
///     .coerce(true)
///     .strict(false)
///     .index_range(0, 9)
///     .field(FieldBuilder::new("quantity", ColumnType::Int).in_range(20.0, 200.0).build())
///     .build();
///
/// assert_eq!(schema.fields.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    coerce: bool,
    strict: bool,
    unique: Vec<String>,
    index: Option<IndexRange>,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the schema description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default coercion mode for every field.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// Sets strict mode (reject undeclared columns).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the composite uniqueness column set.
    pub fn unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Bounds row positions to `min..=max`.
    pub fn index_range(mut self, min: usize, max: usize) -> Self {
        self.index = Some(IndexRange::new(min, max));
        self
    }

    /// Adds a field to the schema.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds multiple fields to the schema.
    pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Builds the schema. The definition is not checked here.
    pub fn build(self) -> TableSchema {
        TableSchema {
            name: self.name,
            description: self.description,
            coerce: self.coerce,
            strict: self.strict,
            unique: self.unique,
            index: self.index,
            fields: self.fields,
        }
    }
}

/// Builder for creating a `FieldSpec`.
///
/// Fields are non-nullable and required unless stated otherwise.
///
/// # Example
///
/// ```rust
/// use etl_core::{ColumnType, FieldBuilder};
///
/// let field = FieldBuilder::new("email", ColumnType::String)
///     .description("Customer email")
///     .pattern(r"[^@]+@[^@]+\.[^@]+")
///     .build();
///
/// assert!(!field.nullable);
/// assert_eq!(field.constraints.len(), 1);
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    spec: FieldSpec,
}

impl FieldBuilder {
    /// Creates a new field builder.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            spec: FieldSpec {
                name: name.into(),
                column_type,
                nullable: false,
                required: true,
                coerce: None,
                description: None,
                constraints: Vec::new(),
            },
        }
    }

    /// Sets whether the field is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.spec.nullable = nullable;
        self
    }

    /// Sets whether the column must be present.
    pub fn required(mut self, required: bool) -> Self {
        self.spec.required = required;
        self
    }

    /// Overrides the schema's coercion mode for this field.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.spec.coerce = Some(coerce);
        self
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = Some(description.into());
        self
    }

    /// Adds a constraint to the field.
    pub fn constraint(mut self, constraint: FieldConstraint) -> Self {
        self.spec.constraints.push(constraint);
        self
    }

    /// Adds an inclusive `[min, max]` range constraint.
    pub fn in_range(self, min: f64, max: f64) -> Self {
        self.constraint(FieldConstraint::Range {
            min: Some(min),
            max: Some(max),
        })
    }

    /// Adds a lower bound (inclusive).
    pub fn min(self, min: f64) -> Self {
        self.constraint(FieldConstraint::Range {
            min: Some(min),
            max: None,
        })
    }

    /// Adds an upper bound (inclusive).
    pub fn max(self, max: f64) -> Self {
        self.constraint(FieldConstraint::Range {
            min: None,
            max: Some(max),
        })
    }

    /// Adds an inclusive string length constraint.
    pub fn length(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.constraint(FieldConstraint::Length { min, max })
    }

    /// Adds a regex pattern constraint.
    pub fn pattern(self, regex: impl Into<String>) -> Self {
        self.constraint(FieldConstraint::Pattern {
            regex: regex.into(),
        })
    }

    /// Adds an allowed-values constraint.
    pub fn allowed_values<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraint(FieldConstraint::AllowedValues {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Builds the field.
    pub fn build(self) -> FieldSpec {
        self.spec
    }
}
