use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{PrepError, Result};

// ---------------------------------------------------------------------------
// Reserved field names
// ---------------------------------------------------------------------------

pub const NAME: &str = "name";
pub const GROUP: &str = "group";
pub const DATE: &str = "date";
pub const ANNOTATE: &str = "annotate";
pub const HIGHLIGHT: &str = "highlight";

/// Columns that carry structure or markup rather than plottable values.
pub const RESERVED_FIELDS: [&str; 5] = [NAME, GROUP, DATE, ANNOTATE, HIGHLIGHT];

/// Token a data file uses in place of a value it does not have.
pub const PLACEHOLDER: &str = "*";

// ---------------------------------------------------------------------------
// CellValue – a single cell of a record
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as handed over by the loader.
/// Delimited text files only ever produce `Text` and `Null`; JSON and
/// Parquet keep their native types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Null,
}

// -- Manual Eq/Ord so CellValue can be compared and sorted --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl CellValue {
    /// Null, blank text, or the `*` placeholder.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == PLACEHOLDER
            }
            _ => false,
        }
    }

    /// Numeric interpretation of the cell. Text is trimmed before parsing;
    /// NaN and infinities are not numbers for charting purposes.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        v.is_finite().then_some(v)
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the dataset
// ---------------------------------------------------------------------------

/// One record: column name → cell. Absent keys and `Null` cells are
/// treated alike by every accessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter returning a new row.
    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.fields.insert(column.to_string(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the cell is absent, blank or a placeholder.
    pub fn is_missing(&self, column: &str) -> bool {
        self.get(column).map_or(true, CellValue::is_missing)
    }

    /// Cell rendered as text, empty string when absent.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Non-empty marker text (used for `annotate` / `highlight`).
    /// Whitespace counts as text.
    pub fn marker(&self, column: &str) -> Option<String> {
        let text = self.text(column);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn name(&self) -> String {
        self.text(NAME)
    }

    pub fn group(&self) -> String {
        self.text(GROUP)
    }

    pub fn annotate(&self) -> Option<String> {
        self.marker(ANNOTATE)
    }

    pub fn highlight(&self) -> Option<String> {
        self.marker(HIGHLIGHT)
    }

    /// Coerce a cell to a number, substituting `fallback` for missing
    /// cells.
    pub fn number_or(&self, row: usize, column: &str, fallback: f64) -> Result<f64> {
        match self.get(column) {
            None => Ok(fallback),
            Some(cell) if cell.is_missing() => Ok(fallback),
            Some(cell) => cell.as_f64().ok_or_else(|| PrepError::NumericCoercion {
                row,
                column: column.to_string(),
                value: cell.to_string(),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded table. `columns` keeps the header order of the source
/// file; it decides which series exist and in which order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Dataset { columns, rows }
    }

    /// Build a dataset from rows alone; columns are collected in
    /// first-seen order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for (col, _) in row.fields() {
                if !columns.iter().any(|c| c == col) {
                    columns.push(col.to_string());
                }
            }
        }
        Dataset { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(PrepError::InputShape {
                column: column.to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// XValue – position of a point along the x axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Date(NaiveDateTime),
    Number(f64),
    Text(String),
}

impl XValue {
    /// Interpret a raw cell without a date format.
    pub fn from_cell(cell: &CellValue) -> Option<XValue> {
        match cell {
            CellValue::Null => None,
            CellValue::Date(d) => Some(XValue::Date(*d)),
            CellValue::Integer(i) => Some(XValue::Number(*i as f64)),
            CellValue::Float(f) => Some(XValue::Number(*f)),
            CellValue::Bool(b) => Some(XValue::Text(b.to_string())),
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Text(s) => Some(match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => XValue::Number(v),
                _ => XValue::Text(s.clone()),
            }),
        }
    }

    /// `Some(true)` when `self` is strictly before `other`. Text positions
    /// are categorical and have no order.
    pub fn precedes(&self, other: &XValue) -> Option<bool> {
        match (self, other) {
            (XValue::Date(a), XValue::Date(b)) => Some(a < b),
            (XValue::Number(a), XValue::Number(b)) => Some(a < b),
            _ => None,
        }
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XValue::Date(d) => write!(f, "{d}"),
            XValue::Number(v) => write!(f, "{v}"),
            XValue::Text(s) => write!(f, "{s}"),
        }
    }
}
