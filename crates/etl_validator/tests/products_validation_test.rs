//! End-to-end validation scenarios on product-shaped row-sets.

use etl_core::{
    Check, ColumnType, DataValue, FieldBuilder, RowSet, SchemaBuilder, TableSchema,
};
use etl_validator::DataValidator;
use pretty_assertions::assert_eq;

fn products_schema() -> TableSchema {
    SchemaBuilder::new("products")
        .coerce(true)
        .unique(["id_prod", "name_prod", "quantity", "price", "category"])
        .index_range(0, 9)
        .field(FieldBuilder::new("id_prod", ColumnType::Int).in_range(1.0, 10.0).build())
        .field(FieldBuilder::new("name_prod", ColumnType::String).build())
        .field(FieldBuilder::new("quantity", ColumnType::Int).min(0.0).build())
        .field(FieldBuilder::new("price", ColumnType::Float).in_range(5.0, 120.0).build())
        .field(FieldBuilder::new("category", ColumnType::String).build())
        .build()
}

fn products(ids: Vec<i64>, quantities: Vec<i64>) -> RowSet {
    let n = ids.len();
    RowSet::from_columns(vec![
        ("id_prod", ids.into_iter().map(DataValue::from).collect()),
        ("name_prod", (0..n).map(|i| DataValue::from(format!("p{i}"))).collect()),
        ("quantity", quantities.into_iter().map(DataValue::from).collect()),
        ("price", vec![DataValue::Float(10.0); n]),
        ("category", vec![DataValue::from("Category A"); n]),
    ])
}

#[test]
fn test_valid_products_pass_unchanged() {
    let validator = DataValidator::new(&products_schema()).unwrap();
    let rows = products(vec![1, 2, 3], vec![20, 30, 40]);

    let validated = validator.validate(rows.clone()).unwrap();
    assert_eq!(validated.rows(), &rows);
    assert_eq!(validated.schema_name(), "products");
}

#[test]
fn test_negative_quantity_names_range_check() {
    let validator = DataValidator::new(&products_schema()).unwrap();
    let rows = products(vec![1, 2], vec![20, -1]);

    let report = validator.validate(rows).unwrap_err();
    assert_eq!(report.len(), 1);
    let violation = &report.violations[0];
    assert_eq!(violation.row, Some(1));
    assert_eq!(violation.column.as_deref(), Some("quantity"));
    assert_eq!(
        violation.check,
        Check::Range {
            min: Some(0.0),
            max: None
        }
    );
    assert_eq!(violation.observed, DataValue::Int(-1));
    assert!(report.to_string().contains("quantity: greater_than_or_equal_to(0) (observed: -1)"));
}

#[test]
fn test_duplicate_rows_all_reported() {
    let validator = DataValidator::new(&products_schema()).unwrap();
    let mut rows = products(vec![1, 2, 3], vec![20, 30, 40]);
    // make rows 0 and 2 identical across the uniqueness set
    rows.set_column(
        "name_prod",
        vec!["same".into(), "other".into(), "same".into()],
    );
    rows.set_column("id_prod", vec![1.into(), 2.into(), 1.into()]);
    rows.set_column("quantity", vec![20.into(), 30.into(), 20.into()]);

    let report = validator.validate(rows).unwrap_err();
    assert_eq!(report.failing_row_positions(), vec![0, 2]);
    assert!(report
        .violations
        .iter()
        .all(|v| matches!(v.check, Check::Unique { .. })));
}

#[test]
fn test_duplicates_detected_after_coercion() {
    let validator = DataValidator::new(&products_schema()).unwrap();
    let mut rows = products(vec![1, 1], vec![20, 20]);
    rows.set_column("name_prod", vec!["same".into(), "same".into()]);
    rows.set_column("price", vec!["10".into(), DataValue::Float(10.0)]);

    let report = validator.validate(rows).unwrap_err();
    assert_eq!(report.failing_row_positions(), vec![0, 1]);
}

#[test]
fn test_index_bound_rejects_eleventh_row() {
    let validator = DataValidator::new(&products_schema()).unwrap();
    let ids: Vec<i64> = (1..=11).map(|i| i.min(10)).collect();
    let rows = products(ids, vec![25; 11]);

    let report = validator.validate(rows).unwrap_err();
    let index_violations: Vec<_> = report
        .violations
        .iter()
        .filter(|v| matches!(v.check, Check::IndexInRange { .. }))
        .collect();
    assert_eq!(index_violations.len(), 1);
    assert_eq!(index_violations[0].row, Some(10));
}

#[test]
fn test_strict_schema_rejects_missing_and_extra_columns() {
    let strict = TableSchema {
        strict: true,
        ..products_schema()
    };
    let validator = DataValidator::new(&strict).unwrap();

    let mut rows = products(vec![1], vec![20]);
    rows.set_column("email", vec!["a@b.com".into()]);
    let report = validator.validate(rows).unwrap_err();
    assert_eq!(report.dataset_violations().count(), 1);
    assert_eq!(report.violations[0].check, Check::ColumnInSchema);

    let missing = RowSet::from_columns(vec![("id_prod", vec![DataValue::Int(1)])]);
    let report = validator.validate(missing).unwrap_err();
    let missing_columns: Vec<_> = report
        .dataset_violations()
        .filter_map(|v| v.column.as_deref())
        .collect();
    assert_eq!(missing_columns, vec!["name_prod", "quantity", "price", "category"]);
}

#[test]
fn test_non_strict_schema_passes_extra_columns_through() {
    let validator = DataValidator::new(&products_schema()).unwrap();
    let mut rows = products(vec![1], vec![20]);
    rows.set_column("supplier", vec![DataValue::from("ACME")]);

    let validated = validator.validate(rows).unwrap();
    assert_eq!(validated.rows().value(0, "supplier"), &DataValue::from("ACME"));
    assert_eq!(validated.rows().columns().len(), 6);
}

#[test]
fn test_failing_rows_keep_extra_index_column() {
    let validator = DataValidator::new(&products_schema()).unwrap();
    let mut rows = products(vec![1, 2], vec![20, 30]);
    rows.set_column("index", vec![DataValue::from("sku-100"), DataValue::from("sku-200")]);
    rows.set_column("price", vec![DataValue::Float(500.0), DataValue::Float(10.0)]);

    let report = validator.validate(rows).unwrap_err();
    let failing = report.failing_rows();

    assert_eq!(failing.len(), 1);
    assert_eq!(failing.value(0, "row_position"), &DataValue::Int(0));
    assert_eq!(failing.value(0, "index"), &DataValue::from("sku-100"));
    assert_eq!(failing.value(0, "price"), &DataValue::Float(500.0));
    assert_eq!(failing.columns().len(), 7);
}

#[test]
fn test_failure_cases_rowset() {
    let validator = DataValidator::new(&products_schema()).unwrap();
    let mut rows = products(vec![1, 20], vec![20, 30]);
    rows.set_column("price", vec![DataValue::Float(2.5), DataValue::Float(10.0)]);

    let report = validator.validate(rows).unwrap_err();
    let cases = report.failure_cases();
    assert_eq!(cases.len(), 2);
    let columns: Vec<_> = cases.column_values("column").cloned().collect();
    assert_eq!(columns, vec![DataValue::from("price"), DataValue::from("id_prod")]);
    let failing = report.failing_rows();
    let positions: Vec<_> = failing.column_values("row_position").cloned().collect();
    assert_eq!(positions, vec![DataValue::Int(0), DataValue::Int(1)]);
}
