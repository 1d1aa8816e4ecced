mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::{check::CheckArgs, infer::InferArgs, run::RunArgs};

#[derive(Parser)]
#[command(name = "etl")]
#[command(version, about = "Bronze product ETL: Postgres to DuckDB with schema checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Query, validate, derive KPIs and load into DuckDB
    Run(RunArgs),

    /// Infer a schema file from the rows a query returns
    Infer(InferArgs),

    /// Check a schema definition without touching any database
    Check(CheckArgs),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::execute(&args),
        Commands::Infer(args) => commands::infer::execute(&args).map(|()| ExitCode::SUCCESS),
        Commands::Check(args) => commands::check::execute(&args).map(|()| ExitCode::SUCCESS),
    }
}
