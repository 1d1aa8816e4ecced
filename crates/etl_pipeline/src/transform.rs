//! Inventory KPI derivation.

use crate::TransformError;
use crate::products::{AVAILABILITY, CATEGORY_NORMALIZED, INVENTORY_TOTAL_VALUE};
use etl_core::{DataValue, RowSet};
use etl_validator::Validated;

/// Columns the transform reads; the input's schema must declare them.
const INPUT_COLUMNS: [&str; 3] = ["quantity", "price", "category"];

/// Appends the inventory KPIs to validated product rows.
///
/// - `inventory_total_value` = quantity × price, null if either is null
/// - `category_normalized` = category in lower case, null stays null
/// - `availability` = quantity > 0, false for null
///
/// Rows keep their count and order and every input column passes through;
/// a derived column already present in the input is replaced. Values are
/// trusted as validated and not checked again.
pub fn transform(validated: Validated) -> Result<RowSet, TransformError> {
    validated.require_columns(&INPUT_COLUMNS)?;
    let mut rows = validated.into_rows();

    let totals: Vec<DataValue> = rows
        .column_values("quantity")
        .zip(rows.column_values("price"))
        .map(|(quantity, price)| match (quantity.as_float(), price.as_float()) {
            (Some(q), Some(p)) => DataValue::Float(q * p),
            _ => DataValue::Null,
        })
        .collect();

    let categories: Vec<DataValue> = rows
        .column_values("category")
        .map(|category| match category {
            DataValue::String(s) => DataValue::String(s.to_lowercase()),
            DataValue::Null => DataValue::Null,
            other => DataValue::String(other.to_string().to_lowercase()),
        })
        .collect();

    let availability: Vec<DataValue> = rows
        .column_values("quantity")
        .map(|quantity| DataValue::Bool(quantity.as_float().is_some_and(|q| q > 0.0)))
        .collect();

    rows.set_column(INVENTORY_TOTAL_VALUE, totals);
    rows.set_column(CATEGORY_NORMALIZED, categories);
    rows.set_column(AVAILABILITY, availability);
    Ok(rows)
}
