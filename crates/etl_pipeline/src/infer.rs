//! Schema inference from sample rows.

use etl_core::{ColumnType, DataValue, FieldBuilder, FieldSpec, RowSet, SchemaBuilder, TableSchema};
use tracing::debug;

/// Infers a schema from a row-set.
///
/// Per column, in row-set order:
/// - type: `int64` if every non-null value is an integer, `float64` if values
///   are numeric with at least one float, `bool` if all are booleans,
///   `string` otherwise (including mixed types and all-null columns)
/// - nullable if any value is null or missing
/// - numeric columns get the observed `[min, max]` range
///
/// The schema coerces, is not strict, and bounds the index to the observed
/// row positions.
pub fn infer_schema(name: &str, rows: &RowSet) -> TableSchema {
    let fields: Vec<FieldSpec> = rows
        .columns()
        .iter()
        .map(|column| infer_field(column, rows))
        .collect();

    let mut builder = SchemaBuilder::new(name)
        .description(format!("Inferred from {} row(s)", rows.len()))
        .coerce(true)
        .strict(false)
        .fields(fields);
    if !rows.is_empty() {
        builder = builder.index_range(0, rows.len() - 1);
    }

    let schema = builder.build();
    debug!(schema = name, fields = schema.fields.len(), "Inferred schema");
    schema
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Observed {
    Nothing,
    Int,
    Float,
    Bool,
    Text,
}

impl Observed {
    fn merge(self, value: &DataValue) -> Self {
        use Observed::*;
        match (self, value) {
            (current, DataValue::Null) => current,
            (Nothing | Int, DataValue::Int(_)) => Int,
            (Nothing | Int | Float, DataValue::Float(_)) | (Float, DataValue::Int(_)) => Float,
            (Nothing | Bool, DataValue::Bool(_)) => Bool,
            _ => Text,
        }
    }

    fn column_type(self) -> ColumnType {
        match self {
            Observed::Int => ColumnType::Int,
            Observed::Float => ColumnType::Float,
            Observed::Bool => ColumnType::Bool,
            Observed::Nothing | Observed::Text => ColumnType::String,
        }
    }
}

fn infer_field(column: &str, rows: &RowSet) -> FieldSpec {
    let mut observed = Observed::Nothing;
    let mut nullable = false;
    let mut range: Option<(f64, f64)> = None;

    for value in rows.column_values(column) {
        nullable |= value.is_null();
        observed = observed.merge(value);
        if let Some(n) = value.as_float() {
            range = Some(match range {
                Some((min, max)) => (min.min(n), max.max(n)),
                None => (n, n),
            });
        }
    }

    let column_type = observed.column_type();
    let mut field = FieldBuilder::new(column, column_type).nullable(nullable);
    if let (true, Some((min, max))) = (column_type.is_numeric(), range) {
        field = field.in_range(min, max);
    }
    field.build()
}
