//! # ETL Validator
//!
//! Validation engine that checks a [`RowSet`](etl_core::RowSet) against a
//! [`TableSchema`](etl_core::TableSchema):
//!
//! - Structure (missing required columns, undeclared columns in strict mode)
//! - Nullability and types, with optional coercion to the declared type
//! - Value constraints (ranges, lengths, allowed values, patterns)
//! - Dataset checks (index bounds, composite uniqueness)
//!
//! A passing row-set comes back wrapped in [`Validated`]; a failing one comes
//! back as a [`ValidationReport`](etl_core::ValidationReport) listing every
//! violation.
//!
//! ## Example
//!
//! ```rust
//! use etl_core::{ColumnType, DataValue, FieldBuilder, RowSet, SchemaBuilder};
//! use etl_validator::DataValidator;
//!
//! let schema = SchemaBuilder::new("orders")
//!     .coerce(true)
//!     .field(FieldBuilder::new("qty", ColumnType::Int).min(0.0).build())
//!     .build();
//! let validator = DataValidator::new(&schema).unwrap();
//!
//! let rows = RowSet::from_columns(vec![("qty", vec![DataValue::from("3")])]);
//! let validated = validator.validate(rows).unwrap();
//! assert_eq!(validated.rows().value(0, "qty"), &DataValue::Int(3));
//!
//! let rows = RowSet::from_columns(vec![("qty", vec![DataValue::Int(-1)])]);
//! let report = validator.validate(rows).unwrap_err();
//! assert_eq!(report.len(), 1);
//! ```

mod constraints;
mod engine;
mod error;
mod quality;
mod schema;
mod validated;

pub use constraints::*;
pub use engine::*;
pub use error::*;
pub use quality::*;
pub use schema::*;
pub use validated::*;
