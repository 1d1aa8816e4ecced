//! Error types for the pipeline.
//!
//! Validation failures are not errors: they end a run with a
//! [`RunOutcome`](crate::RunOutcome) carrying the report. The errors here
//! are faults that abort the run.

use etl_core::SchemaError;
use etl_io::IoError;
use etl_parser::ParserError;
use etl_validator::ValidationError;
use thiserror::Error;

/// The transform refused its input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    /// The rows were validated against a schema that does not declare the
    /// columns the transform reads
    #[error("Transform input is not trusted: {0}")]
    UntrustedInput(#[from] ValidationError),
}

/// Faults that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source could not be reached or the query failed
    #[error("Source error: {0}")]
    Source(#[source] IoError),

    /// The sink could not be written
    #[error("Sink error: {0}")]
    Sink(#[source] IoError),

    /// A schema definition is malformed
    #[error("Schema error: {0}")]
    Schema(#[from] ValidationError),

    /// A schema file could not be read
    #[error("Schema file error: {0}")]
    SchemaFile(#[from] ParserError),

    /// The transform refused its input
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The JSON artifact could not be written
    #[error("Failed to write artifact: {0}")]
    Artifact(String),

    /// The pipeline configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<SchemaError> for PipelineError {
    fn from(err: SchemaError) -> Self {
        PipelineError::Schema(ValidationError::Definition(err))
    }
}
