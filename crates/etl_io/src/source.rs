//! Row sources.

use crate::{ConnectionSettings, IoError};
use etl_core::RowSet;

/// Runs a query against a database and returns the rows.
pub trait RowSource {
    /// Runs `sql` with the given connection settings.
    fn query(&mut self, sql: &str, settings: &ConnectionSettings) -> Result<RowSet, IoError>;
}

/// In-memory source returning a canned row-set or a canned failure.
///
/// Every query issued is recorded.
#[derive(Debug, Clone)]
pub struct MemorySource {
    result: Result<RowSet, IoError>,
    queries: Vec<String>,
}

impl MemorySource {
    /// Creates a source that answers every query with `rows`.
    pub fn new(rows: RowSet) -> Self {
        Self {
            result: Ok(rows),
            queries: Vec::new(),
        }
    }

    /// Creates a source whose every query fails with `error`.
    pub fn failing(error: IoError) -> Self {
        Self {
            result: Err(error),
            queries: Vec::new(),
        }
    }

    /// Queries issued so far, in order.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }
}

impl RowSource for MemorySource {
    fn query(&mut self, sql: &str, _settings: &ConnectionSettings) -> Result<RowSet, IoError> {
        self.queries.push(sql.to_string());
        self.result.clone()
    }
}

#[cfg(feature = "postgres")]
pub use self::postgres_source::PostgresSource;

#[cfg(feature = "postgres")]
mod postgres_source {
    use super::RowSource;
    use crate::converter::decode_text;
    use crate::{ConnectionSettings, IoError};
    use etl_core::{DataRow, RowSet};
    use postgres::{Config, NoTls, SimpleQueryMessage};
    use tracing::{debug, info};

    /// Postgres source.
    ///
    /// Connects with the given settings for every query. The statement is
    /// prepared first to learn the column types, then run through the
    /// simple-query protocol; each text value is decoded by its column type,
    /// so `numeric` columns arrive as floats without a decimal dependency.
    #[derive(Debug, Default)]
    pub struct PostgresSource;

    impl PostgresSource {
        /// Creates a new Postgres source.
        pub fn new() -> Self {
            Self
        }

        fn config(settings: &ConnectionSettings) -> Result<Config, IoError> {
            let mut config = Config::new();
            if !settings.host.is_empty() {
                config.host(&settings.host);
            }
            if !settings.user.is_empty() {
                config.user(&settings.user);
            }
            if !settings.password.is_empty() {
                config.password(&settings.password);
            }
            if !settings.dbname.is_empty() {
                config.dbname(&settings.dbname);
            }
            if let Some(port) = settings.port_number()? {
                config.port(port);
            }
            Ok(config)
        }
    }

    impl RowSource for PostgresSource {
        fn query(&mut self, sql: &str, settings: &ConnectionSettings) -> Result<RowSet, IoError> {
            debug!(host = %settings.host, db = %settings.dbname, "Connecting to Postgres");
            let mut client = Self::config(settings)?
                .connect(NoTls)
                .map_err(|e| IoError::connection(e.to_string()))?;

            let statement = client
                .prepare(sql)
                .map_err(|e| IoError::query(e.to_string()))?;
            let columns: Vec<(String, String)> = statement
                .columns()
                .iter()
                .map(|c| (c.name().to_string(), c.type_().name().to_string()))
                .collect();

            let messages = client
                .simple_query(sql)
                .map_err(|e| IoError::query(e.to_string()))?;

            let mut rowset = RowSet::with_columns(columns.iter().map(|(name, _)| name.clone()));
            for message in messages {
                if let SimpleQueryMessage::Row(row) = message {
                    let mut data = DataRow::with_capacity(columns.len());
                    for (idx, (name, type_name)) in columns.iter().enumerate() {
                        data.insert(name.clone(), decode_text(name, type_name, row.get(idx))?);
                    }
                    rowset.add_row(data);
                }
            }

            info!(rows = rowset.len(), columns = columns.len(), "Query returned rows");
            Ok(rowset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_core::DataValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_source_records_queries() {
        let rows = RowSet::from_columns(vec![("id", vec![DataValue::Int(1)])]);
        let mut source = MemorySource::new(rows.clone());

        let result = source
            .query("SELECT 1", &ConnectionSettings::default())
            .unwrap();

        assert_eq!(result, rows);
        assert_eq!(source.queries(), &["SELECT 1".to_string()]);
    }

    #[test]
    fn test_memory_source_failure() {
        let mut source = MemorySource::failing(IoError::connection("refused"));
        let err = source
            .query("SELECT 1", &ConnectionSettings::default())
            .unwrap_err();
        assert_eq!(err, IoError::connection("refused"));
    }
}
