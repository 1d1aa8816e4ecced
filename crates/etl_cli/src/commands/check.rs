use anyhow::{Context, Result};
use clap::Args;
use etl_pipeline::{SchemaChoice, products};
use etl_validator::DataValidator;
use std::path::PathBuf;
use tracing::info;

use super::BuiltinSchema;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Schema file (YAML or TOML); omit to check a built-in schema
    pub schema_file: Option<PathBuf>,

    /// Built-in schema checked when no file is given
    #[arg(long, value_enum, default_value = "products", conflicts_with = "schema_file")]
    pub builtin: BuiltinSchema,

    /// Check the enriched schema derived from it instead
    #[arg(long)]
    pub enriched: bool,

    /// Output format: text, json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn execute(args: &CheckArgs) -> Result<()> {
    let mut schema = match &args.schema_file {
        Some(path) => {
            info!("Checking schema file: {}", path.display());
            etl_parser::parse_file(path)
                .with_context(|| format!("Failed to parse schema file: {}", path.display()))?
        }
        None => SchemaChoice::from(args.builtin).schema(),
    };

    if args.enriched {
        schema = products::enriched_schema_for(&schema)
            .with_context(|| format!("Cannot derive an enriched schema from '{}'", schema.name))?;
    }

    DataValidator::new(&schema).with_context(|| format!("Schema '{}' is invalid", schema.name))?;

    if args.format == OutputFormat::Text {
        output::print_success(&format!("Schema '{}' is valid", schema.name));
    }
    output::print_schema(&schema, args.format)
}
