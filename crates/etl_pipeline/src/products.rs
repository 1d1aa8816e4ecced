//! Product schemas.
//!
//! The bronze table is checked against [`raw_schema`] (or the stricter
//! [`email_schema`] when a contact email column is expected); the output of
//! [`transform`](crate::transform) is checked against the raw schema extended
//! with the derived KPI columns.

use etl_core::{ColumnType, FieldBuilder, FieldSpec, SchemaBuilder, SchemaError, TableSchema};

/// Name of the raw product schema.
pub const RAW_SCHEMA: &str = "products_raw";
/// Name of the raw product schema with a contact email column.
pub const EMAIL_SCHEMA: &str = "products_email";
/// Name of the enriched product schema.
pub const ENRICHED_SCHEMA: &str = "products_enriched";

/// Derived column: quantity times price.
pub const INVENTORY_TOTAL_VALUE: &str = "inventory_total_value";
/// Derived column: category in lower case.
pub const CATEGORY_NORMALIZED: &str = "category_normalized";
/// Derived column: whether any stock is left.
pub const AVAILABILITY: &str = "availability";

/// Pattern a contact email must match at its start.
pub const EMAIL_PATTERN: &str = r"[^@]+@[^@]+\.[^@]+";

const UNIQUE_COLUMNS: [&str; 5] = ["id_prod", "name_prod", "quantity", "price", "category"];

fn product_fields() -> Vec<FieldSpec> {
    vec![
        FieldBuilder::new("id_prod", ColumnType::Int)
            .in_range(1.0, 10.0)
            .description("Unique product identifier")
            .build(),
        FieldBuilder::new("name_prod", ColumnType::String)
            .description("Name of the product")
            .build(),
        FieldBuilder::new("quantity", ColumnType::Int)
            .in_range(20.0, 200.0)
            .description("Available quantity of the product")
            .build(),
        FieldBuilder::new("price", ColumnType::Float)
            .in_range(5.0, 120.0)
            .description("Price of the product")
            .build(),
        FieldBuilder::new("category", ColumnType::String)
            .description("Category of the product")
            .build(),
    ]
}

/// Schema of the rows read from the bronze table.
pub fn raw_schema() -> TableSchema {
    SchemaBuilder::new(RAW_SCHEMA)
        .description("Bronze product rows")
        .coerce(true)
        .strict(false)
        .unique(UNIQUE_COLUMNS)
        .index_range(0, 9)
        .fields(product_fields())
        .build()
}

/// Raw schema variant requiring a contact email and nothing else.
pub fn email_schema() -> TableSchema {
    SchemaBuilder::new(EMAIL_SCHEMA)
        .description("Bronze product rows with a customer email")
        .coerce(true)
        .strict(true)
        .unique(UNIQUE_COLUMNS)
        .index_range(0, 9)
        .fields(product_fields())
        .field(
            FieldBuilder::new("email", ColumnType::String)
                .pattern(EMAIL_PATTERN)
                .description("Customer email")
                .build(),
        )
        .build()
}

/// The derived KPI columns appended by the transform.
pub fn derived_fields() -> Vec<FieldSpec> {
    vec![
        FieldBuilder::new(INVENTORY_TOTAL_VALUE, ColumnType::Float)
            .min(0.0)
            .description("Quantity times price")
            .build(),
        FieldBuilder::new(CATEGORY_NORMALIZED, ColumnType::String)
            // no upper-case letter anywhere
            .pattern(r"\P{Lu}*$")
            .description("Category in lower case")
            .build(),
        FieldBuilder::new(AVAILABILITY, ColumnType::Bool)
            .description("Whether any stock is left")
            .build(),
    ]
}

/// Enriched schema built on top of any raw schema.
///
/// Fails if the raw schema already declares one of the derived columns.
pub fn enriched_schema_for(raw: &TableSchema) -> Result<TableSchema, SchemaError> {
    let mut enriched = raw.extend(ENRICHED_SCHEMA, derived_fields())?;
    enriched.description = Some(match &raw.description {
        Some(description) => format!("{description}, with inventory KPIs"),
        None => "Product rows with inventory KPIs".to_string(),
    });
    Ok(enriched)
}

/// Enriched schema for the default raw schema.
pub fn enriched_schema() -> Result<TableSchema, SchemaError> {
    enriched_schema_for(&raw_schema())
}
