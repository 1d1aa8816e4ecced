//! # ETL Core
//!
//! Core data structures shared by every stage of the bronze product pipeline.
//!
//! ## Key Concepts
//!
//! - **RowSet**: an ordered collection of records sharing a column layout
//! - **TableSchema**: declarative per-column and dataset-wide constraints
//! - **ValidationReport**: every violation found when a row-set fails a schema
//!
//! ## Example
//!
//! ```rust
//! use etl_core::{ColumnType, FieldBuilder, SchemaBuilder};
//!
//! let schema = SchemaBuilder::new("products_raw")
//!     .coerce(true)
//!     .unique(["id_prod"])
//!     .field(
//!         FieldBuilder::new("id_prod", ColumnType::Int)
//!             .in_range(1.0, 10.0)
//!             .build(),
//!     )
//!     .field(FieldBuilder::new("category", ColumnType::String).build())
//!     .build();
//!
//! assert!(schema.check_definition().is_ok());
//! assert_eq!(schema.column_names(), vec!["id_prod", "category"]);
//! ```

pub mod builder;
pub mod dataset;
pub mod error;
pub mod report;
pub mod schema;

pub use builder::*;
pub use dataset::*;
pub use error::*;
pub use report::*;
pub use schema::*;
