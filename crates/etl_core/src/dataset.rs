//! Row-set representation for every pipeline stage.
//!
//! A [`RowSet`] keeps its rows in order (row position is the implicit index that
//! index constraints refer to) together with the ordered list of column names
//! the sink and the reports use for layout.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A scalar value in a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

static NULL: DataValue = DataValue::Null;

impl DataValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "bool",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::String(_) => "string",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{b}"),
            DataValue::Int(i) => write!(f, "{i}"),
            // Debug keeps the trailing ".0" so floats stay recognisable in reports
            DataValue::Float(x) => write!(f, "{x:?}"),
            DataValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<i32> for DataValue {
    fn from(i: i32) -> Self {
        DataValue::Int(i64::from(i))
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

/// A single row of data.
pub type DataRow = HashMap<String, DataValue>;

/// An ordered collection of rows sharing a column layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<DataRow>,
}

impl RowSet {
    /// Creates a new empty row-set with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an empty row-set with the given column layout.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rowset = Self::empty();
        for column in columns {
            rowset.register_column(column.into());
        }
        rowset
    }

    /// Creates a row-set from rows. Columns are discovered from the rows,
    /// in sorted order per row.
    pub fn from_rows(rows: Vec<DataRow>) -> Self {
        let mut rowset = Self::empty();
        for row in rows {
            rowset.add_row(row);
        }
        rowset
    }

    /// Creates a row-set from named columns of values.
    ///
    /// Columns shorter than the longest one are padded with nulls.
    pub fn from_columns<S>(columns: Vec<(S, Vec<DataValue>)>) -> Self
    where
        S: Into<String>,
    {
        let len = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let mut rowset = Self {
            columns: Vec::new(),
            rows: vec![DataRow::new(); len],
        };
        for (name, values) in columns {
            rowset.set_column(name, values);
        }
        rowset
    }

    /// Returns the column names in layout order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the row-set has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the row-set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows.iter()
    }

    /// Returns a mutable iterator over the rows.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut DataRow> {
        self.rows.iter_mut()
    }

    /// Gets a specific row by position.
    pub fn get_row(&self, index: usize) -> Option<&DataRow> {
        self.rows.get(index)
    }

    /// Returns the value at `row`/`column`; absent cells read as null.
    pub fn value(&self, row: usize, column: &str) -> &DataValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }

    /// Returns every value of a column in row order; absent cells read as null.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a DataValue> {
        self.rows.iter().map(move |r| r.get(column).unwrap_or(&NULL))
    }

    /// Appends a row, registering any columns not seen before.
    pub fn add_row(&mut self, row: DataRow) {
        let mut new_columns: Vec<&String> = row
            .keys()
            .filter(|k| !self.columns.contains(k))
            .collect();
        new_columns.sort();
        let new_columns: Vec<String> = new_columns.into_iter().cloned().collect();
        self.columns.extend(new_columns);
        self.rows.push(row);
    }

    /// Sets a column by position, appending it to the layout if new.
    ///
    /// Values are assigned to rows in order; rows beyond the end of `values`
    /// get null, values beyond the last row are ignored.
    pub fn set_column<S, I>(&mut self, name: S, values: I)
    where
        S: Into<String>,
        I: IntoIterator<Item = DataValue>,
    {
        let name = name.into();
        let mut values = values.into_iter();
        for row in &mut self.rows {
            let value = values.next().unwrap_or(DataValue::Null);
            row.insert(name.clone(), value);
        }
        self.register_column(name);
    }

    /// Returns a new row-set with the rows at the given positions, in the
    /// order given. Out-of-range positions are skipped.
    pub fn select_rows(&self, positions: &[usize]) -> RowSet {
        RowSet {
            columns: self.columns.clone(),
            rows: positions
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Returns the columns present in the layout but not in `declared`.
    pub fn extra_columns<'a>(&'a self, declared: &HashSet<&str>) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !declared.contains(c))
            .collect()
    }

    fn register_column(&mut self, name: String) {
        if !self.columns.contains(&name) {
            self.columns.push(name);
        }
    }
}

impl FromIterator<DataRow> for RowSet {
    fn from_iter<T: IntoIterator<Item = DataRow>>(iter: T) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}
