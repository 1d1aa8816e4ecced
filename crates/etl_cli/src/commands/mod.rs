pub mod check;
pub mod infer;
pub mod run;

use clap::ValueEnum;
use etl_io::EnvSettingsLoader;
use etl_pipeline::SchemaChoice;
use std::path::Path;

/// Built-in raw schemas selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuiltinSchema {
    /// Five product columns, extra columns tolerated
    Products,
    /// Product columns plus a customer email, strict
    ProductsEmail,
}

impl From<BuiltinSchema> for SchemaChoice {
    fn from(schema: BuiltinSchema) -> Self {
        match schema {
            BuiltinSchema::Products => SchemaChoice::Products,
            BuiltinSchema::ProductsEmail => SchemaChoice::ProductsEmail,
        }
    }
}

fn settings_loader(env_file: Option<&Path>) -> EnvSettingsLoader {
    match env_file {
        Some(path) => EnvSettingsLoader::with_env_file(path),
        None => EnvSettingsLoader::new(),
    }
}
