use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use etl_core::{Check, DataValue, ROW_POSITION_COLUMN, TableSchema, ValidationReport};
use etl_pipeline::RunSummary;
use serde_json::json;

/// Output format for reports and summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_validation_report(
    report: &ValidationReport,
    stage: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_report(report, stage),
        OutputFormat::Text => {
            print_text_report(report, stage);
            Ok(())
        }
    }
}

fn print_text_report(report: &ValidationReport, stage: &str) {
    println!("\n{}", "═".repeat(60));
    println!("{}", format!("  VALIDATION REPORT ({stage} stage)").bold());
    println!("{}", "═".repeat(60));

    println!(
        "\n{} {}",
        "✗".red().bold(),
        format!("Schema '{}' failed validation", report.schema)
            .red()
            .bold()
    );

    let dataset: Vec<_> = report.dataset_violations().collect();
    if !dataset.is_empty() {
        println!("\n{}", "Dataset:".red().bold());
        for (i, violation) in dataset.iter().enumerate() {
            println!("  {}. {}", i + 1, violation.to_string().red());
        }
    }

    let positions = report.failing_row_positions();
    if !positions.is_empty() {
        println!("\n{}", "Rows:".red().bold());
        let failing = report.failing_rows();
        for snapshot in failing.rows() {
            let Some(position) = snapshot
                .get(ROW_POSITION_COLUMN)
                .and_then(DataValue::as_int)
                .and_then(|p| usize::try_from(p).ok())
            else {
                continue;
            };
            let cells: Vec<String> = failing
                .columns()
                .iter()
                .filter(|column| column.as_str() != ROW_POSITION_COLUMN)
                .map(|column| {
                    let value = snapshot
                        .get(column)
                        .map_or_else(|| "null".to_string(), ToString::to_string);
                    format!("{column}={value}")
                })
                .collect();
            println!("  {} {}", format!("Row {position}:").bold(), cells.join(", "));
            for violation in report.violations_for_row(position) {
                println!("    - {}", violation.to_string().yellow());
            }
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Rows checked:  {}", report.stats.rows_checked);
    println!("  Violations:    {}", report.len());
    println!("  Failing rows:  {}", positions.len());
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &ValidationReport, stage: &str) -> Result<()> {
    let output = json!({
        "passed": false,
        "stage": stage,
        "report": report,
        "summary": {
            "violation_count": report.len(),
            "failing_rows": report.failing_row_positions(),
        }
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to render report as JSON")?
    );
    Ok(())
}

pub fn print_run_summary(summary: &RunSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = json!({ "passed": true, "summary": summary });
            println!(
                "{}",
                serde_json::to_string_pretty(&output)
                    .context("Failed to render summary as JSON")?
            );
        }
        OutputFormat::Text => {
            print_success(&format!(
                "Loaded {} row(s) into table '{}'",
                summary.rows_loaded, summary.table
            ));
            if let Some(artifact) = &summary.artifact {
                print_info(&format!("Artifact written to: {}", artifact.display()));
            }
            let elapsed = summary.finished_at - summary.started_at;
            print_info(&format!("Finished in {} ms", elapsed.num_milliseconds()));
        }
    }
    Ok(())
}

pub fn print_schema(schema: &TableSchema, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(schema).context("Failed to render schema as JSON")?
            );
        }
        OutputFormat::Text => print_schema_text(schema),
    }
    Ok(())
}

fn print_schema_text(schema: &TableSchema) {
    println!("\nSchema Summary:");
    println!("  Name:        {}", schema.name);
    println!(
        "  Description: {}",
        schema.description.as_deref().unwrap_or("N/A")
    );
    println!("  Coerce:      {}", schema.coerce);
    println!("  Strict:      {}", schema.strict);
    if !schema.unique.is_empty() {
        println!("  Unique:      {}", schema.unique.join(", "));
    }
    if let Some(index) = &schema.index {
        let check = Check::IndexInRange {
            min: index.min,
            max: index.max,
        };
        println!("  Index:       {check}");
    }
    println!("  Fields:      {}", schema.fields.len());

    for field in &schema.fields {
        let mut flags = Vec::new();
        if field.nullable {
            flags.push("nullable".to_string());
        }
        if !field.required {
            flags.push("optional".to_string());
        }
        flags.extend(field.constraints.iter().map(|c| Check::from(c).to_string()));

        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        println!(
            "    - {}: {}{}",
            field.name.bold(),
            field.column_type,
            flags.dimmed()
        );
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
