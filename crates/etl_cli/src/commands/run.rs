use anyhow::{Context, Result};
use clap::Args;
use etl_io::{DuckDbSink, PostgresSource};
use etl_pipeline::{Pipeline, PipelineConfig, RunOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use super::{BuiltinSchema, settings_loader};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Pipeline config file (TOML); flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Query run against Postgres
    #[arg(short, long)]
    pub query: Option<String>,

    /// Target DuckDB table, replaced on success
    #[arg(short, long)]
    pub table: Option<String>,

    /// DuckDB database file
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Write the JSON snapshot of the loaded rows to this path
    #[arg(long, conflicts_with = "no_artifact")]
    pub artifact: Option<PathBuf>,

    /// Skip the JSON snapshot
    #[arg(long)]
    pub no_artifact: bool,

    /// Built-in raw schema
    #[arg(long, value_enum)]
    pub schema: Option<BuiltinSchema>,

    /// Raw schema file (YAML or TOML), overrides --schema
    #[arg(long)]
    pub schema_file: Option<PathBuf>,

    /// Env file holding the POSTGRES_* settings (defaults to ./.env)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Output format: text, json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn execute(args: &RunArgs) -> Result<ExitCode> {
    let config = build_config(args)?;
    let raw_schema = config.raw_schema().context("Failed to load raw schema")?;
    info!(
        schema = %raw_schema.name,
        table = %config.table,
        database = %config.database.display(),
        "Starting pipeline"
    );

    let sink = DuckDbSink::new(config.database.clone());
    let settings = settings_loader(args.env_file.as_deref());
    let mut pipeline = Pipeline::new(config, &raw_schema, PostgresSource::new(), sink, settings)
        .context("Failed to set up pipeline")?;

    match pipeline.run().context("Pipeline run failed")? {
        RunOutcome::Loaded(summary) => {
            output::print_run_summary(&summary, args.format)?;
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::RawValidationFailed(report) => {
            output::print_validation_report(&report, "raw", args.format)?;
            Ok(ExitCode::FAILURE)
        }
        RunOutcome::EnrichedValidationFailed(report) => {
            output::print_validation_report(&report, "enriched", args.format)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Loads the config file, if any, then applies the command-line overrides.
fn build_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(query) = &args.query {
        config.query = query.clone();
    }
    if let Some(table) = &args.table {
        config.table = table.clone();
    }
    if let Some(database) = &args.database {
        config.database = database.clone();
    }
    if let Some(artifact) = &args.artifact {
        config.artifact = artifact.clone();
        config.write_artifact = true;
    }
    if args.no_artifact {
        config.write_artifact = false;
    }
    if let Some(schema) = args.schema {
        config.schema = schema.into();
    }
    if let Some(schema_file) = &args.schema_file {
        config.schema_file = Some(schema_file.clone());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_pipeline::SchemaChoice;
    use pretty_assertions::assert_eq;

    fn args() -> RunArgs {
        RunArgs {
            config: None,
            query: None,
            table: None,
            database: None,
            artifact: None,
            no_artifact: false,
            schema: None,
            schema_file: None,
            env_file: None,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn test_defaults_without_flags() {
        assert_eq!(build_config(&args()).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etl.toml");
        std::fs::write(&path, "table = \"from_file\"\nquery = \"SELECT 1\"\n").unwrap();

        let config = build_config(&RunArgs {
            config: Some(path),
            table: Some("from_flag".to_string()),
            no_artifact: true,
            schema: Some(BuiltinSchema::ProductsEmail),
            ..args()
        })
        .unwrap();

        assert_eq!(config.table, "from_flag");
        assert_eq!(config.query, "SELECT 1");
        assert!(!config.write_artifact);
        assert_eq!(config.schema, SchemaChoice::ProductsEmail);
    }

    #[test]
    fn test_missing_config_file() {
        let result = build_config(&RunArgs {
            config: Some(PathBuf::from("/nonexistent/etl.toml")),
            ..args()
        });
        assert!(result.is_err());
    }
}
