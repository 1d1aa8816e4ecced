//! Pipeline configuration.

use crate::{PipelineError, products};
use etl_core::TableSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use etl_io::DEFAULT_DATABASE;

/// Default source query.
pub const DEFAULT_QUERY: &str = "SELECT * FROM products_bronze";
/// Default target table.
pub const DEFAULT_TABLE: &str = "table_kpi";
/// Default JSON artifact path.
pub const DEFAULT_ARTIFACT: &str = "inferred_schema.json";

/// Built-in raw schema to validate the source rows against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaChoice {
    /// `products_raw`: five product columns, extra columns tolerated
    #[default]
    Products,
    /// `products_email`: product columns plus a customer email, strict
    ProductsEmail,
}

impl SchemaChoice {
    /// Returns the schema.
    pub fn schema(self) -> TableSchema {
        match self {
            SchemaChoice::Products => products::raw_schema(),
            SchemaChoice::ProductsEmail => products::email_schema(),
        }
    }
}

/// Settings of one pipeline run.
///
/// Every field has a default, so a config file only lists what it changes:
///
/// ```toml
/// query = "SELECT * FROM products_bronze WHERE category <> 'archived'"
/// table = "table_kpi"
/// database = "warehouse.duckdb"
/// write_artifact = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Query run against the source
    pub query: String,

    /// Target table, replaced on every successful run
    pub table: String,

    /// DuckDB database file
    pub database: PathBuf,

    /// Path of the JSON snapshot of the loaded rows
    pub artifact: PathBuf,

    /// Whether to write the JSON snapshot
    pub write_artifact: bool,

    /// Built-in raw schema, used when no schema file is given
    pub schema: SchemaChoice,

    /// Raw schema file (YAML or TOML), overriding `schema`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_file: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            table: DEFAULT_TABLE.to_string(),
            database: PathBuf::from(DEFAULT_DATABASE),
            artifact: PathBuf::from(DEFAULT_ARTIFACT),
            write_artifact: true,
            schema: SchemaChoice::default(),
            schema_file: None,
        }
    }
}

impl PipelineConfig {
    /// Creates a new builder starting from the defaults.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Parses a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, PipelineError> {
        toml::from_str(content).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Loads a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Resolves the raw schema: the schema file if set, else the built-in choice.
    pub fn raw_schema(&self) -> Result<TableSchema, PipelineError> {
        match &self.schema_file {
            Some(path) => Ok(etl_parser::parse_file(path)?),
            None => Ok(self.schema.schema()),
        }
    }

    /// Checks the settings that have no usable default.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.query.trim().is_empty() {
            return Err(PipelineError::Config("query cannot be empty".to_string()));
        }
        if self.table.trim().is_empty() {
            return Err(PipelineError::Config("table cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for `PipelineConfig`.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Sets the source query.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.config.query = query.into();
        self
    }

    /// Sets the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.config.table = table.into();
        self
    }

    /// Sets the DuckDB database file.
    pub fn database(mut self, database: impl Into<PathBuf>) -> Self {
        self.config.database = database.into();
        self
    }

    /// Writes the JSON snapshot to `path`.
    pub fn artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.artifact = path.into();
        self.config.write_artifact = true;
        self
    }

    /// Skips the JSON snapshot.
    pub fn no_artifact(mut self) -> Self {
        self.config.write_artifact = false;
        self
    }

    /// Selects a built-in raw schema.
    pub fn schema(mut self, schema: SchemaChoice) -> Self {
        self.config.schema = schema;
        self
    }

    /// Reads the raw schema from a file instead.
    pub fn schema_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.schema_file = Some(path.into());
        self
    }

    /// Builds the config.
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
