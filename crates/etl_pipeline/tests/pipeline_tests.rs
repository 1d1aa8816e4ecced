use etl_core::{
    Check, ColumnType, DataValue, FieldBuilder, RowSet, SchemaBuilder, SchemaError, TableSchema,
};
use etl_io::{ConnectionSettings, IoError, MemorySink, MemorySource};
use etl_pipeline::products::{self, AVAILABILITY, CATEGORY_NORMALIZED, INVENTORY_TOTAL_VALUE};
use etl_pipeline::{
    Pipeline, PipelineConfig, PipelineError, PipelineState, RunOutcome, TransformError,
};
use etl_validator::ValidationError;
use pretty_assertions::assert_eq;

type MemoryPipeline = Pipeline<MemorySource, MemorySink, ConnectionSettings>;

fn bronze_rows() -> RowSet {
    RowSet::from_columns(vec![
        ("id_prod", vec![1.into(), 2.into(), 3.into()]),
        (
            "name_prod",
            vec!["Product A".into(), "Product B".into(), "Product C".into()],
        ),
        ("quantity", vec![20.into(), 150.into(), 35.into()]),
        ("price", vec![5.0.into(), 10.0.into(), 99.9.into()]),
        (
            "category",
            vec!["Category A".into(), "CATEGORY B".into(), "Category C".into()],
        ),
    ])
}

fn pipeline_with(schema: &TableSchema, source: MemorySource) -> MemoryPipeline {
    let config = PipelineConfig::builder().no_artifact().build();
    Pipeline::new(
        config,
        schema,
        source,
        MemorySink::new(),
        ConnectionSettings::default(),
    )
    .unwrap()
}

fn column(rows: &RowSet, name: &str) -> Vec<DataValue> {
    rows.column_values(name).cloned().collect()
}

#[test]
fn test_valid_rows_are_loaded() {
    let mut pipeline = pipeline_with(&products::raw_schema(), MemorySource::new(bronze_rows()));

    let outcome = pipeline.run().unwrap();

    let RunOutcome::Loaded(summary) = outcome else {
        panic!("expected a load, got {outcome:?}");
    };
    assert_eq!(summary.rows_loaded, 3);
    assert_eq!(summary.table, "table_kpi");
    assert_eq!(summary.artifact, None);
    assert!(summary.finished_at >= summary.started_at);
    assert_eq!(pipeline.state(), PipelineState::Loaded);
    assert_eq!(pipeline.source().queries(), &["SELECT * FROM products_bronze"]);

    let table = pipeline.sink().table("table_kpi").unwrap();
    assert_eq!(table.columns().len(), 8);
    assert_eq!(
        column(table, INVENTORY_TOTAL_VALUE),
        vec![100.0.into(), 1500.0.into(), DataValue::Float(35.0 * 99.9)]
    );
    assert_eq!(
        column(table, CATEGORY_NORMALIZED),
        vec!["category a".into(), "category b".into(), "category c".into()]
    );
    assert_eq!(
        column(table, AVAILABILITY),
        vec![true.into(), true.into(), true.into()]
    );
}

#[test]
fn test_string_cells_are_coerced_before_transform() {
    let mut rows = bronze_rows();
    rows.set_column("quantity", vec!["20".into(), "150".into(), "35".into()]);
    let mut pipeline = pipeline_with(&products::raw_schema(), MemorySource::new(rows));

    assert!(pipeline.run().unwrap().is_loaded());
    let table = pipeline.sink().table("table_kpi").unwrap();
    assert_eq!(table.value(0, "quantity"), &DataValue::Int(20));
    assert_eq!(table.value(0, INVENTORY_TOTAL_VALUE), &DataValue::Float(100.0));
}

#[test]
fn test_negative_quantity_halts_before_load() {
    let schema = SchemaBuilder::new("stock")
        .coerce(true)
        .field(FieldBuilder::new("quantity", ColumnType::Int).min(0.0).build())
        .field(FieldBuilder::new("price", ColumnType::Float).build())
        .field(FieldBuilder::new("category", ColumnType::String).build())
        .build();
    let rows = RowSet::from_columns(vec![
        ("quantity", vec![4.into(), (-1).into()]),
        ("price", vec![1.0.into(), 2.0.into()]),
        ("category", vec!["A".into(), "B".into()]),
    ]);
    let mut pipeline = pipeline_with(&schema, MemorySource::new(rows));

    let outcome = pipeline.run().unwrap();

    let RunOutcome::RawValidationFailed(report) = &outcome else {
        panic!("expected a raw validation failure, got {outcome:?}");
    };
    assert_eq!(report.schema, "stock");
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
    assert_eq!(report.failing_row_positions(), vec![1]);

    assert_eq!(pipeline.state(), PipelineState::RawValidationFailed);
    assert_eq!(pipeline.sink().writes(), 0);
}

#[test]
fn test_duplicate_rows_are_all_reported() {
    let rows = RowSet::from_columns(vec![
        ("id_prod", vec![1.into(), 1.into()]),
        ("name_prod", vec!["Widget".into(), "Widget".into()]),
        ("quantity", vec![20.into(), 20.into()]),
        ("price", vec![5.0.into(), 5.0.into()]),
        ("category", vec!["Tools".into(), "Tools".into()]),
    ]);
    let mut pipeline = pipeline_with(&products::raw_schema(), MemorySource::new(rows));

    let outcome = pipeline.run().unwrap();

    let report = outcome.report().unwrap();
    assert!(matches!(outcome, RunOutcome::RawValidationFailed(_)));
    assert_eq!(report.failing_row_positions(), vec![0, 1]);
    assert!(
        report
            .violations
            .iter()
            .all(|v| matches!(v.check, Check::Unique { .. }))
    );
    assert_eq!(pipeline.sink().table_count(), 0);
}

#[test]
fn test_source_failure_is_a_fault() {
    let source = MemorySource::failing(IoError::connection("connection refused"));
    let mut pipeline = pipeline_with(&products::raw_schema(), source);

    let err = pipeline.run().unwrap_err();

    assert!(matches!(err, PipelineError::Source(IoError::ConnectionError(_))));
    assert_eq!(pipeline.state(), PipelineState::Start);
    assert_eq!(pipeline.sink().writes(), 0);
}

#[test]
fn test_enriched_failure_halts_before_load() {
    // Nullable quantity passes the raw stage but yields a null total value,
    // which the enriched schema does not allow.
    let schema = SchemaBuilder::new("loose")
        .coerce(true)
        .field(
            FieldBuilder::new("quantity", ColumnType::Int)
                .nullable(true)
                .build(),
        )
        .field(FieldBuilder::new("price", ColumnType::Float).build())
        .field(FieldBuilder::new("category", ColumnType::String).build())
        .build();
    let rows = RowSet::from_columns(vec![
        ("quantity", vec![3.into(), DataValue::Null]),
        ("price", vec![1.0.into(), 2.0.into()]),
        ("category", vec!["A".into(), "B".into()]),
    ]);
    let mut pipeline = pipeline_with(&schema, MemorySource::new(rows));

    let outcome = pipeline.run().unwrap();

    let RunOutcome::EnrichedValidationFailed(report) = &outcome else {
        panic!("expected an enriched validation failure, got {outcome:?}");
    };
    assert_eq!(report.schema, products::ENRICHED_SCHEMA);
    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].row, Some(1));
    assert_eq!(
        report.violations[0].column.as_deref(),
        Some(INVENTORY_TOTAL_VALUE)
    );
    assert_eq!(report.violations[0].check, Check::NotNullable);

    assert_eq!(pipeline.state(), PipelineState::EnrichedValidationFailed);
    assert_eq!(pipeline.sink().writes(), 0);
}

#[test]
fn test_schema_without_transform_inputs_is_a_fault() {
    let schema = SchemaBuilder::new("ids_only")
        .field(FieldBuilder::new("id_prod", ColumnType::Int).build())
        .build();
    let mut pipeline = pipeline_with(&schema, MemorySource::new(bronze_rows()));

    let err = pipeline.run().unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Transform(TransformError::UntrustedInput(
            ValidationError::MissingDeclaredColumns { .. }
        ))
    ));
    assert_eq!(pipeline.state(), PipelineState::RawValidated);
    assert_eq!(pipeline.sink().writes(), 0);
}

#[test]
fn test_invalid_schema_fails_before_query() {
    let schema = SchemaBuilder::new("broken")
        .field(FieldBuilder::new("category", ColumnType::String).pattern("(").build())
        .build();
    let config = PipelineConfig::builder().no_artifact().build();

    let result = Pipeline::new(
        config,
        &schema,
        MemorySource::new(bronze_rows()),
        MemorySink::new(),
        ConnectionSettings::default(),
    );

    assert!(matches!(result, Err(PipelineError::Schema(_))));
}

#[test]
fn test_raw_schema_declaring_derived_column_is_rejected() {
    let schema = SchemaBuilder::new("clash")
        .field(FieldBuilder::new(AVAILABILITY, ColumnType::Bool).build())
        .build();
    let config = PipelineConfig::builder().no_artifact().build();

    let result = Pipeline::new(
        config,
        &schema,
        MemorySource::new(RowSet::empty()),
        MemorySink::new(),
        ConnectionSettings::default(),
    );

    assert!(matches!(
        result,
        Err(PipelineError::Schema(ValidationError::Definition(
            SchemaError::DuplicateField { .. }
        )))
    ));
}

#[test]
fn test_empty_query_is_a_config_error() {
    let config = PipelineConfig::builder().query("  ").build();
    let result = Pipeline::new(
        config,
        &products::raw_schema(),
        MemorySource::new(RowSet::empty()),
        MemorySink::new(),
        ConnectionSettings::default(),
    );
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[test]
fn test_rerun_replaces_table() {
    let mut pipeline = pipeline_with(&products::raw_schema(), MemorySource::new(bronze_rows()));

    pipeline.run().unwrap();
    let first = pipeline.sink().table("table_kpi").cloned().unwrap();
    pipeline.run().unwrap();

    assert_eq!(pipeline.sink().writes(), 2);
    assert_eq!(pipeline.sink().table_count(), 1);
    assert_eq!(pipeline.sink().table("table_kpi"), Some(&first));
    assert_eq!(pipeline.state(), PipelineState::Loaded);
    assert_eq!(pipeline.source().queries().len(), 2);
}

#[test]
fn test_artifact_is_written_after_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inferred_schema.json");
    let config = PipelineConfig::builder()
        .table("kpi")
        .artifact(&path)
        .build();
    let mut pipeline = Pipeline::new(
        config,
        &products::raw_schema(),
        MemorySource::new(bronze_rows()),
        MemorySink::new(),
        ConnectionSettings::default(),
    )
    .unwrap();

    let outcome = pipeline.run().unwrap();

    let RunOutcome::Loaded(summary) = outcome else {
        panic!("expected a load, got {outcome:?}");
    };
    assert_eq!(summary.table, "kpi");
    assert_eq!(summary.artifact.as_deref(), Some(path.as_path()));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["availability"], serde_json::json!([true, true, true]));
    assert_eq!(json["id_prod"], serde_json::json!([1, 2, 3]));
}

#[test]
fn test_artifact_failure_does_not_undo_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("inferred_schema.json");
    let config = PipelineConfig::builder()
        .table("kpi")
        .artifact(&path)
        .build();
    let mut pipeline = Pipeline::new(
        config,
        &products::raw_schema(),
        MemorySource::new(bronze_rows()),
        MemorySink::new(),
        ConnectionSettings::default(),
    )
    .unwrap();

    let outcome = pipeline.run().unwrap();

    let RunOutcome::Loaded(summary) = outcome else {
        panic!("expected a load, got {outcome:?}");
    };
    assert_eq!(summary.rows_loaded, 3);
    assert_eq!(summary.artifact, None);
    assert_eq!(pipeline.state(), PipelineState::Loaded);
    assert_eq!(pipeline.sink().writes(), 1);
    assert_eq!(pipeline.sink().table("kpi").map(RowSet::len), Some(3));
    assert!(!path.exists());
}

#[test]
fn test_no_artifact_on_validation_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inferred_schema.json");
    let mut rows = bronze_rows();
    rows.set_column("price", vec![500.0.into(), 10.0.into(), 10.0.into()]);
    let config = PipelineConfig::builder().artifact(&path).build();
    let mut pipeline = Pipeline::new(
        config,
        &products::raw_schema(),
        MemorySource::new(rows),
        MemorySink::new(),
        ConnectionSettings::default(),
    )
    .unwrap();

    assert!(!pipeline.run().unwrap().is_loaded());
    assert!(!path.exists());
}
