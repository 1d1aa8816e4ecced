use anyhow::{Context, Result};
use clap::Args;
use etl_io::{PostgresSource, RowSource, SettingsLoader};
use etl_pipeline::infer_schema;
use std::path::PathBuf;
use tracing::info;

use super::settings_loader;
use crate::output;

#[derive(Debug, Args)]
pub struct InferArgs {
    /// Query whose rows the schema is inferred from
    #[arg(short, long, default_value = etl_pipeline::DEFAULT_QUERY)]
    pub query: String,

    /// Name of the inferred schema
    #[arg(short, long, default_value = "products_bronze")]
    pub name: String,

    /// Output file; the extension selects YAML or TOML
    #[arg(short, long, default_value = "schema_crm.yml")]
    pub output: PathBuf,

    /// Env file holding the POSTGRES_* settings (defaults to ./.env)
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}

pub fn execute(args: &InferArgs) -> Result<()> {
    // fail on a bad extension before touching the database
    etl_parser::detect_format(&args.output)
        .with_context(|| format!("Cannot write a schema to: {}", args.output.display()))?;

    let settings = settings_loader(args.env_file.as_deref()).load();
    info!("Inferring schema from: {}", args.query);
    let rows = PostgresSource::new()
        .query(&args.query, &settings)
        .context("Failed to query source")?;
    output::print_info(&format!("Fetched {} row(s)", rows.len()));

    let schema = infer_schema(&args.name, &rows);
    let rendered = etl_parser::write_file(&schema, &args.output)
        .with_context(|| format!("Failed to write schema file: {}", args.output.display()))?;

    println!("{rendered}");
    output::print_success(&format!("Schema written to: {}", args.output.display()));
    Ok(())
}
