//! Pipeline driver.
//!
//! Runs query → validate raw → transform → validate enriched → load, and
//! stops at the first stage that fails. Validation failures end the run with
//! a [`RunOutcome`] carrying the report; faults return a [`PipelineError`].

use crate::{PipelineConfig, PipelineError, products, transform, write_artifact};
use chrono::{DateTime, Utc};
use etl_core::{TableSchema, ValidationReport};
use etl_io::{RowSource, SettingsLoader, TableSink};
use etl_validator::DataValidator;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Stage a pipeline has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing done yet
    Start,
    /// Source rows fetched
    Queried,
    /// Source rows passed the raw schema
    RawValidated,
    /// KPIs derived
    Transformed,
    /// Derived rows passed the enriched schema
    EnrichedValidated,
    /// Target table replaced
    Loaded,
    /// Source rows failed the raw schema
    RawValidationFailed,
    /// Derived rows failed the enriched schema
    EnrichedValidationFailed,
}

impl PipelineState {
    /// Returns true for states a run ends in.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Loaded
                | PipelineState::RawValidationFailed
                | PipelineState::EnrichedValidationFailed
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Start => "start",
            PipelineState::Queried => "queried",
            PipelineState::RawValidated => "raw_validated",
            PipelineState::Transformed => "transformed",
            PipelineState::EnrichedValidated => "enriched_validated",
            PipelineState::Loaded => "loaded",
            PipelineState::RawValidationFailed => "raw_validation_failed",
            PipelineState::EnrichedValidationFailed => "enriched_validation_failed",
        };
        f.write_str(name)
    }
}

/// What a successful load did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Rows written to the target table
    pub rows_loaded: usize,
    /// Target table
    pub table: String,
    /// JSON snapshot written, if any
    pub artifact: Option<PathBuf>,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

/// How a run ended, short of a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every stage passed and the table was replaced
    Loaded(RunSummary),
    /// The source rows failed the raw schema; nothing was transformed or written
    RawValidationFailed(ValidationReport),
    /// The derived rows failed the enriched schema; nothing was written
    EnrichedValidationFailed(ValidationReport),
}

impl RunOutcome {
    /// Returns true if the table was replaced.
    pub fn is_loaded(&self) -> bool {
        matches!(self, RunOutcome::Loaded(_))
    }

    /// Returns the validation report of a halted run.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            RunOutcome::Loaded(_) => None,
            RunOutcome::RawValidationFailed(report)
            | RunOutcome::EnrichedValidationFailed(report) => Some(report),
        }
    }
}

/// The bronze product pipeline.
///
/// Generic over its source, sink and settings loader so tests can run the
/// whole flow in memory.
#[derive(Debug)]
pub struct Pipeline<S, K, L> {
    config: PipelineConfig,
    source: S,
    sink: K,
    settings: L,
    raw: DataValidator,
    enriched: DataValidator,
    state: PipelineState,
}

impl<S, K, L> Pipeline<S, K, L>
where
    S: RowSource,
    K: TableSink,
    L: SettingsLoader,
{
    /// Creates a pipeline validating source rows against `raw_schema`.
    ///
    /// The enriched schema is `raw_schema` plus the derived columns. Both
    /// schema definitions are checked here, before any query is issued.
    pub fn new(
        config: PipelineConfig,
        raw_schema: &TableSchema,
        source: S,
        sink: K,
        settings: L,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let enriched_schema = products::enriched_schema_for(raw_schema)?;

        Ok(Self {
            raw: DataValidator::new(raw_schema)?,
            enriched: DataValidator::new(&enriched_schema)?,
            config,
            source,
            sink,
            settings,
            state: PipelineState::Start,
        })
    }

    /// Returns the stage the last run reached.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Returns the raw schema.
    pub fn raw_schema(&self) -> &TableSchema {
        self.raw.schema()
    }

    /// Returns the enriched schema.
    pub fn enriched_schema(&self) -> &TableSchema {
        self.enriched.schema()
    }

    fn advance(&mut self, next: PipelineState) {
        info!(from = %self.state, to = %next, "Pipeline state");
        self.state = next;
    }

    /// Runs the pipeline once.
    ///
    /// Runs are independent: a pipeline that already ran starts over.
    pub fn run(&mut self) -> Result<RunOutcome, PipelineError> {
        let started_at = Utc::now();
        if self.state != PipelineState::Start {
            self.advance(PipelineState::Start);
        }

        // 1. Query
        let settings = self.settings.load();
        let rows = self
            .source
            .query(&self.config.query, &settings)
            .map_err(PipelineError::Source)?;
        self.advance(PipelineState::Queried);

        // 2. Raw validation
        let validated = match self.raw.validate(rows) {
            Ok(validated) => validated,
            Err(report) => {
                warn!(schema = %report.schema, violations = report.len(), "Raw validation failed");
                self.advance(PipelineState::RawValidationFailed);
                return Ok(RunOutcome::RawValidationFailed(report));
            }
        };
        self.advance(PipelineState::RawValidated);

        // 3. Transform
        let enriched = transform(validated)?;
        self.advance(PipelineState::Transformed);

        // 4. Enriched validation
        let validated = match self.enriched.validate(enriched) {
            Ok(validated) => validated,
            Err(report) => {
                warn!(schema = %report.schema, violations = report.len(), "Enriched validation failed");
                self.advance(PipelineState::EnrichedValidationFailed);
                return Ok(RunOutcome::EnrichedValidationFailed(report));
            }
        };
        self.advance(PipelineState::EnrichedValidated);

        // 5. Load
        let rows = validated.into_rows();
        self.sink
            .replace_table(&self.config.table, &rows)
            .map_err(PipelineError::Sink)?;

        // The table is committed at this point; a failed artifact write is
        // reported but does not turn the run into a fault.
        let artifact = if self.config.write_artifact {
            match write_artifact(&self.config.artifact, &rows) {
                Ok(()) => Some(self.config.artifact.clone()),
                Err(e) => {
                    warn!(
                        error = %e,
                        path = %self.config.artifact.display(),
                        "Failed to write artifact after load"
                    );
                    None
                }
            }
        } else {
            None
        };
        self.advance(PipelineState::Loaded);

        Ok(RunOutcome::Loaded(RunSummary {
            rows_loaded: rows.len(),
            table: self.config.table.clone(),
            artifact,
            started_at,
            finished_at: Utc::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::Start.to_string(), "start");
        assert_eq!(
            PipelineState::EnrichedValidationFailed.to_string(),
            "enriched_validation_failed"
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(PipelineState::Loaded.is_terminal());
        assert!(PipelineState::RawValidationFailed.is_terminal());
        assert!(!PipelineState::Transformed.is_terminal());
    }
}
