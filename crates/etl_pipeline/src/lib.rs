//! # ETL Pipeline
//!
//! The bronze product pipeline: query the source, validate the raw rows,
//! derive inventory KPIs, validate the enriched rows and replace the target
//! table.
//!
//! - [`products`]: the raw, email and enriched product schemas
//! - [`transform`]: the pure KPI derivation on validated rows
//! - [`Pipeline`]: the driver and its observable [`PipelineState`]
//! - [`infer_schema`]: bootstraps a schema from sample rows
//! - [`PipelineConfig`]: query, table, database and artifact settings
//!
//! ## Example
//!
//! ```rust
//! use etl_core::{DataValue, RowSet};
//! use etl_io::{ConnectionSettings, MemorySink, MemorySource};
//! use etl_pipeline::{Pipeline, PipelineConfig, RunOutcome, products};
//!
//! let rows = RowSet::from_columns(vec![
//!     ("id_prod", vec![DataValue::Int(1)]),
//!     ("name_prod", vec!["Widget".into()]),
//!     ("quantity", vec![DataValue::Int(20)]),
//!     ("price", vec![DataValue::Float(5.0)]),
//!     ("category", vec!["Tools".into()]),
//! ]);
//!
//! let config = PipelineConfig::builder().no_artifact().build();
//! let mut pipeline = Pipeline::new(
//!     config,
//!     &products::raw_schema(),
//!     MemorySource::new(rows),
//!     MemorySink::new(),
//!     ConnectionSettings::default(),
//! )
//! .unwrap();
//!
//! match pipeline.run().unwrap() {
//!     RunOutcome::Loaded(summary) => assert_eq!(summary.rows_loaded, 1),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

mod artifact;
mod config;
mod driver;
mod error;
mod infer;
pub mod products;
mod transform;

pub use artifact::{columnar_json, write_artifact};
pub use config::{
    DEFAULT_ARTIFACT, DEFAULT_DATABASE, DEFAULT_QUERY, DEFAULT_TABLE, PipelineConfig,
    PipelineConfigBuilder, SchemaChoice,
};
pub use driver::{Pipeline, PipelineState, RunOutcome, RunSummary};
pub use error::{PipelineError, TransformError};
pub use infer::infer_schema;
pub use transform::transform;
