//! Validation report types.
//!
//! A [`ValidationReport`] is data, not a message: it lists every violation with
//! its row position, column, failed check and observed value, keeps a snapshot
//! of each offending row, and can be turned back into a [`RowSet`] so callers
//! can act on individual rows.

use crate::{ColumnType, DataRow, DataValue, FieldConstraint, RowSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The rule a violation failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    /// A required column is absent from the row-set
    ColumnInDataframe,
    /// The row-set has a column a strict schema does not declare
    ColumnInSchema,
    /// Null in a non-nullable column
    NotNullable,
    /// Value has the wrong type and coercion is off
    Dtype {
        /// Declared type
        expected: ColumnType,
    },
    /// Value could not be cast to the declared type
    CoerceDtype {
        /// Declared type
        expected: ColumnType,
    },
    /// Numeric value outside the inclusive range
    Range {
        /// Lower bound
        min: Option<f64>,
        /// Upper bound
        max: Option<f64>,
    },
    /// String length outside the inclusive range
    Length {
        /// Lower bound
        min: Option<usize>,
        /// Upper bound
        max: Option<usize>,
    },
    /// Value not in the allowed set
    AllowedValues {
        /// Allowed values
        values: Vec<String>,
    },
    /// String does not match the pattern
    Pattern {
        /// Regular expression
        regex: String,
    },
    /// Row duplicates another across the uniqueness columns
    Unique {
        /// Uniqueness column set
        columns: Vec<String>,
    },
    /// Row position outside the index bounds
    IndexInRange {
        /// Lowest admissible position
        min: Option<usize>,
        /// Highest admissible position
        max: Option<usize>,
    },
}

fn bound<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(|| "None".to_string(), ToString::to_string)
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::ColumnInDataframe => write!(f, "column_in_dataframe"),
            Check::ColumnInSchema => write!(f, "column_in_schema"),
            Check::NotNullable => write!(f, "not_nullable"),
            Check::Dtype { expected } => write!(f, "dtype('{expected}')"),
            Check::CoerceDtype { expected } => write!(f, "coerce_dtype('{expected}')"),
            Check::Range {
                min: Some(min),
                max: None,
            } => write!(f, "greater_than_or_equal_to({min})"),
            Check::Range {
                min: None,
                max: Some(max),
            } => write!(f, "less_than_or_equal_to({max})"),
            Check::Range { min, max } => write!(f, "in_range({}, {})", bound(min), bound(max)),
            Check::Length { min, max } => write!(f, "str_length({}, {})", bound(min), bound(max)),
            Check::AllowedValues { values } => write!(f, "isin([{}])", values.join(", ")),
            Check::Pattern { regex } => write!(f, "str_matches('{regex}')"),
            Check::Unique { columns } => write!(f, "unique({})", columns.join(", ")),
            Check::IndexInRange { min, max } => {
                write!(f, "index_in_range({}, {})", bound(min), bound(max))
            }
        }
    }
}

impl From<&FieldConstraint> for Check {
    fn from(constraint: &FieldConstraint) -> Self {
        match constraint {
            FieldConstraint::Range { min, max } => Check::Range {
                min: *min,
                max: *max,
            },
            FieldConstraint::Length { min, max } => Check::Length {
                min: *min,
                max: *max,
            },
            FieldConstraint::AllowedValues { values } => Check::AllowedValues {
                values: values.clone(),
            },
            FieldConstraint::Pattern { regex } => Check::Pattern {
                regex: regex.clone(),
            },
        }
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Row position, or `None` for dataset-level violations
    pub row: Option<usize>,
    /// Column involved, if any
    pub column: Option<String>,
    /// Check that failed
    #[serde(flatten)]
    pub check: Check,
    /// Offending value
    pub observed: DataValue,
}

impl Violation {
    /// Creates a violation for one cell.
    pub fn cell(row: usize, column: impl Into<String>, check: Check, observed: DataValue) -> Self {
        Self {
            row: Some(row),
            column: Some(column.into()),
            check,
            observed,
        }
    }

    /// Creates a violation for a whole row, not tied to one column.
    pub fn row(row: usize, check: Check, observed: DataValue) -> Self {
        Self {
            row: Some(row),
            column: None,
            check,
            observed,
        }
    }

    /// Creates a dataset-level violation about a column.
    pub fn column(column: impl Into<String>, check: Check) -> Self {
        Self {
            row: None,
            column: Some(column.into()),
            check,
            observed: DataValue::Null,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "{column}: {}", self.check)?,
            None => write!(f, "{}", self.check)?,
        }
        if !self.observed.is_null() || self.row.is_some() {
            write!(f, " (observed: {})", self.observed)?;
        }
        Ok(())
    }
}

/// Column of [`ValidationReport::failing_rows`] holding each row's position.
pub const ROW_POSITION_COLUMN: &str = "row_position";

/// Statistics about a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationStats {
    /// Number of rows scanned
    pub rows_checked: usize,
    /// Number of declared columns checked
    pub columns_checked: usize,
    /// Number of cells checked
    pub cells_checked: usize,
    /// Validation duration in milliseconds
    pub duration_ms: u64,
}

/// Every violation found when a row-set fails a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Name of the schema that was checked
    pub schema: String,

    /// All violations, in discovery order
    pub violations: Vec<Violation>,

    /// Validation statistics
    pub stats: ValidationStats,

    #[serde(skip)]
    rows: BTreeMap<usize, Vec<(String, DataValue)>>,
}

impl ValidationReport {
    /// Creates an empty report for a schema.
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            violations: Vec::new(),
            stats: ValidationStats::default(),
            rows: BTreeMap::new(),
        }
    }

    /// Adds a violation to the report.
    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Keeps a snapshot of an offending row, in the given column order.
    pub fn record_row(&mut self, position: usize, row: &DataRow, columns: &[String]) {
        self.rows.entry(position).or_insert_with(|| {
            columns
                .iter()
                .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(DataValue::Null)))
                .collect()
        });
    }

    /// Returns true if no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns violations not tied to a row (missing or extra columns).
    pub fn dataset_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.row.is_none())
    }

    /// Returns the violations of one row.
    pub fn violations_for_row(&self, position: usize) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.row == Some(position))
    }

    /// Returns the positions of every offending row, ascending.
    pub fn failing_row_positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self.violations.iter().filter_map(|v| v.row).collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    /// Returns the offending rows as a row-set, with their position in a
    /// leading [`ROW_POSITION_COLUMN`] column.
    ///
    /// Source columns keep their values, including one named `index`.
    pub fn failing_rows(&self) -> RowSet {
        // snapshots share the layout of the row-set they came from
        let layout = self
            .rows
            .values()
            .next()
            .map(|cells| cells.iter().map(|(c, _)| c.clone()).collect::<Vec<_>>())
            .unwrap_or_default();
        let mut rowset =
            RowSet::with_columns(std::iter::once(ROW_POSITION_COLUMN.to_string()).chain(layout));
        for (position, cells) in &self.rows {
            let mut row: DataRow = cells.iter().cloned().collect();
            row.insert(
                ROW_POSITION_COLUMN.to_string(),
                DataValue::Int(*position as i64),
            );
            rowset.add_row(row);
        }
        rowset
    }

    /// Returns one row per violation with columns `index`, `column`, `check`
    /// and `failure_case`.
    pub fn failure_cases(&self) -> RowSet {
        let mut rowset = RowSet::with_columns(["index", "column", "check", "failure_case"]);
        for violation in &self.violations {
            let mut row = DataRow::new();
            row.insert(
                "index".to_string(),
                violation.row.map(|r| r as i64).into(),
            );
            row.insert("column".to_string(), violation.column.clone().into());
            row.insert("check".to_string(), violation.check.to_string().into());
            row.insert("failure_case".to_string(), violation.observed.clone());
            rowset.add_row(row);
        }
        rowset
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let positions = self.failing_row_positions();
        writeln!(
            f,
            "Schema '{}' failed validation: {} violation(s) across {} row(s)",
            self.schema,
            self.violations.len(),
            positions.len()
        )?;

        let dataset: Vec<&Violation> = self.dataset_violations().collect();
        if !dataset.is_empty() {
            writeln!(f, "Dataset:")?;
            for violation in dataset {
                writeln!(f, "  - {violation}")?;
            }
        }

        for position in positions {
            match self.rows.get(&position) {
                Some(cells) => {
                    let rendered: Vec<String> =
                        cells.iter().map(|(c, v)| format!("{c}={v}")).collect();
                    writeln!(f, "Row {position}: {}", rendered.join(", "))?;
                }
                None => writeln!(f, "Row {position}:")?,
            }
            for violation in self.violations_for_row(position) {
                writeln!(f, "  - {violation}")?;
            }
        }
        Ok(())
    }
}
