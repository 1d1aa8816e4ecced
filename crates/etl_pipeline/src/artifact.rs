//! Columnar JSON snapshot of the loaded rows.

use crate::PipelineError;
use etl_core::RowSet;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::path::Path;
use tracing::info;

/// Serializes a row-set as `{column: [values...]}` in column order.
struct Columnar<'a>(&'a RowSet);

struct Column<'a> {
    rows: &'a RowSet,
    name: &'a str,
}

impl Serialize for Columnar<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = self.0.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for name in columns {
            map.serialize_entry(name, &Column { rows: self.0, name })?;
        }
        map.end()
    }
}

impl Serialize for Column<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for value in self.rows.column_values(self.name) {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// Renders a row-set as pretty-printed columnar JSON.
pub fn columnar_json(rows: &RowSet) -> Result<String, PipelineError> {
    serde_json::to_string_pretty(&Columnar(rows)).map_err(|e| PipelineError::Artifact(e.to_string()))
}

/// Writes the columnar JSON snapshot of `rows` to `path`.
pub fn write_artifact(path: &Path, rows: &RowSet) -> Result<(), PipelineError> {
    let json = columnar_json(rows)?;
    std::fs::write(path, json)
        .map_err(|e| PipelineError::Artifact(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), rows = rows.len(), "Wrote artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_core::DataValue;
    use pretty_assertions::assert_eq;

    fn rows() -> RowSet {
        RowSet::from_columns(vec![
            ("zeta", vec![DataValue::Int(1), DataValue::Null]),
            ("alpha", vec![DataValue::Float(2.5), DataValue::Bool(true)]),
        ])
    }

    #[test]
    fn test_columnar_json_keeps_column_order() {
        let json = columnar_json(&rows()).unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["zeta"], serde_json::json!([1, null]));
        assert_eq!(value["alpha"], serde_json::json!([2.5, true]));
    }

    #[test]
    fn test_write_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inferred_schema.json");

        write_artifact(&path, &rows()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, columnar_json(&rows()).unwrap());
    }

    #[test]
    fn test_write_artifact_bad_path() {
        let err = write_artifact(Path::new("/nonexistent/dir/out.json"), &rows()).unwrap_err();
        assert!(matches!(err, PipelineError::Artifact(_)));
    }
}
