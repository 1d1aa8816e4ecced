//! Table sinks.

use crate::IoError;
use etl_core::RowSet;
use std::collections::HashMap;

/// DuckDB database file used when none is configured.
pub const DEFAULT_DATABASE: &str = "my_duckdb.db";

/// Durable tabular store receiving the final row-set.
pub trait TableSink {
    /// Replaces the table `name` with `rows`.
    ///
    /// Drop-and-recreate: after a successful call the table holds exactly
    /// `rows`, whatever it held before.
    fn replace_table(&mut self, name: &str, rows: &RowSet) -> Result<(), IoError>;
}

/// In-memory sink keeping tables by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: HashMap<String, RowSet>,
    writes: usize,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current content of a table.
    pub fn table(&self, name: &str) -> Option<&RowSet> {
        self.tables.get(name)
    }

    /// Number of tables currently held.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of successful replace calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TableSink for MemorySink {
    fn replace_table(&mut self, name: &str, rows: &RowSet) -> Result<(), IoError> {
        self.tables.insert(name.to_string(), rows.clone());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(feature = "duckdb")]
pub use self::duckdb_sink::DuckDbSink;

#[cfg(feature = "duckdb")]
mod duckdb_sink {
    use super::{DEFAULT_DATABASE, TableSink};
    use crate::IoError;
    use crate::converter::{column_sql_type, from_duckdb_value, quote_ident, to_duckdb_value};
    use duckdb::Connection;
    use etl_core::{DataRow, RowSet};
    use std::path::{Path, PathBuf};
    use tracing::{debug, info};

    /// DuckDB sink backed by a database file.
    ///
    /// The file is opened on the first write, so a run that fails before
    /// loading leaves no file behind.
    #[derive(Debug)]
    pub struct DuckDbSink {
        path: PathBuf,
        conn: Option<Connection>,
    }

    impl DuckDbSink {
        /// Creates a sink writing to the database file at `path`.
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                conn: None,
            }
        }

        /// Returns the database file path.
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn connection(&mut self) -> Result<&mut Connection, IoError> {
            if self.conn.is_none() {
                debug!(path = %self.path.display(), "Opening DuckDB database");
                self.conn = Some(Connection::open(&self.path)?);
            }
            self.conn
                .as_mut()
                .ok_or_else(|| IoError::sink("database connection unavailable"))
        }

        /// Reads a table back, with columns in table order.
        pub fn read_table(&mut self, name: &str) -> Result<RowSet, IoError> {
            let conn = self.connection()?;

            let columns: Vec<String> = {
                let mut stmt = conn.prepare(
                    "SELECT column_name FROM information_schema.columns \
                     WHERE table_name = ? ORDER BY ordinal_position",
                )?;
                let names = stmt.query_map(duckdb::params![name], |row| row.get::<_, String>(0))?;
                names.collect::<Result<_, _>>()?
            };
            if columns.is_empty() {
                return Err(IoError::sink(format!("table '{name}' does not exist")));
            }

            let select = columns
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Vec<_>>()
                .join(", ");
            let mut stmt = conn.prepare(&format!("SELECT {select} FROM {}", quote_ident(name)))?;
            let rows = stmt.query_map(duckdb::params![], |row| {
                let mut data = DataRow::with_capacity(columns.len());
                for (idx, column) in columns.iter().enumerate() {
                    let value: duckdb::types::Value = row.get(idx)?;
                    data.insert(column.clone(), from_duckdb_value(value));
                }
                Ok(data)
            })?;

            let mut rowset = RowSet::with_columns(columns.iter().cloned());
            for row in rows {
                rowset.add_row(row?);
            }
            Ok(rowset)
        }
    }

    impl Default for DuckDbSink {
        fn default() -> Self {
            Self::new(DEFAULT_DATABASE)
        }
    }

    impl TableSink for DuckDbSink {
        fn replace_table(&mut self, name: &str, rows: &RowSet) -> Result<(), IoError> {
            if rows.columns().is_empty() {
                return Err(IoError::sink(format!(
                    "cannot create table '{name}' without columns"
                )));
            }

            let table = quote_ident(name);
            let types: Vec<&'static str> = rows
                .columns()
                .iter()
                .map(|c| column_sql_type(rows.column_values(c)))
                .collect();
            let definition = rows
                .columns()
                .iter()
                .zip(&types)
                .map(|(c, t)| format!("{} {t}", quote_ident(c)))
                .collect::<Vec<_>>()
                .join(", ");

            let path = self.path.display().to_string();
            let conn = self.connection()?;
            let tx = conn.transaction()?;
            tx.execute_batch(&format!(
                "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({definition});"
            ))?;
            {
                let placeholders = vec!["?"; types.len()].join(", ");
                let mut insert = tx.prepare(&format!("INSERT INTO {table} VALUES ({placeholders})"))?;
                for position in 0..rows.len() {
                    let values: Vec<duckdb::types::Value> = rows
                        .columns()
                        .iter()
                        .zip(&types)
                        .map(|(c, t)| to_duckdb_value(rows.value(position, c), t))
                        .collect();
                    insert.execute(duckdb::params_from_iter(values))?;
                }
            }
            tx.commit()?;

            info!(table = name, rows = rows.len(), database = %path, "Replaced table");
            Ok(())
        }
    }
}
