//! Schema files in YAML and TOML.
//!
//! This module reads and writes [`TableSchema`] values as YAML or TOML, so a
//! schema can be declared outside the code or saved after inference. Parsing
//! does not check the definition; building a validator does.
//!
//! # Example
//!
//! ```rust
//! use etl_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: products_raw
//! coerce: true
//! unique: [id_prod]
//! index: { min: 0, max: 9 }
//! fields:
//!   - name: id_prod
//!     type: int64
//!     constraints:
//!       - type: range
//!         min: 1
//!         max: 10
//! "#;
//!
//! let schema = parse_yaml(yaml).expect("Failed to parse schema");
//! assert_eq!(schema.name, "products_raw");
//! assert!(schema.coerce);
//! ```

use etl_core::TableSchema;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading or writing schema files.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or serialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// TOML serialization failed
    #[error("Failed to write TOML: {0}")]
    TomlWriteError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a schema from a YAML string.
pub fn parse_yaml(content: &str) -> Result<TableSchema> {
    let schema: TableSchema = serde_yaml_ng::from_str(content)?;
    Ok(schema)
}

/// Parse a schema from a TOML string.
///
/// # Example
///
/// ```rust
/// use etl_parser::parse_toml;
///
/// let toml = r#"
/// name = "products"
/// strict = true
///
/// [[fields]]
/// name = "email"
/// type = "string"
///
/// [[fields.constraints]]
/// type = "pattern"
/// regex = '[^@]+@[^@]+\.[^@]+'
/// "#;
///
/// let schema = parse_toml(toml).unwrap();
/// assert!(schema.strict);
/// assert_eq!(schema.fields[0].constraints.len(), 1);
/// ```
pub fn parse_toml(content: &str) -> Result<TableSchema> {
    toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))
}

/// Detect the schema format from a file path based on its extension.
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<SchemaFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SchemaFormat::Yaml),
        "toml" => Ok(SchemaFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a schema from a file, with the format taken from its extension.
pub fn parse_file(path: &Path) -> Result<TableSchema> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        SchemaFormat::Yaml => parse_yaml(&content),
        SchemaFormat::Toml => parse_toml(&content),
    }
}

/// Render a schema as YAML.
pub fn to_yaml(schema: &TableSchema) -> Result<String> {
    Ok(serde_yaml_ng::to_string(schema)?)
}

/// Render a schema as TOML.
pub fn to_toml(schema: &TableSchema) -> Result<String> {
    toml::to_string(schema).map_err(|e| ParserError::TomlWriteError(e.to_string()))
}

/// Render a schema in the given format.
pub fn render(schema: &TableSchema, format: SchemaFormat) -> Result<String> {
    match format {
        SchemaFormat::Yaml => to_yaml(schema),
        SchemaFormat::Toml => to_toml(schema),
    }
}

/// Write a schema to a file, with the format taken from its extension.
///
/// Returns the rendered text that was written.
pub fn write_file(schema: &TableSchema, path: &Path) -> Result<String> {
    let rendered = render(schema, detect_format(path)?)?;
    std::fs::write(path, &rendered)?;
    Ok(rendered)
}
