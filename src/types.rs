//! Core data model for the import pipeline.
//!
//! Decoders produce [`RawRow`]s, the row mapper turns them into [`TargetRecord`]s, and the
//! ingestion loop accumulates a [`BatchOutcome`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A single decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing/empty cell.
    #[default]
    Empty,
    /// Text cell.
    Text(String),
    /// Numeric cell (integers are stored as whole floats).
    Number(f64),
    /// Boolean cell.
    Bool(bool),
}

impl CellValue {
    /// Returns true for [`CellValue::Empty`] and for text cells with no characters.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => {
                // Phone numbers and ids typed as numbers must not pick up a ".0" suffix.
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

pub(crate) static EMPTY_CELL: CellValue = CellValue::Empty;

/// One decoded spreadsheet row, keyed by column letter (`"A"`, `"B"`, ..., `"AA"`).
///
/// Columns that were not present in the source read as [`CellValue::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: BTreeMap<String, CellValue>,
}

impl RawRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; empty cells are not stored.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set the value of a column. Empty values are dropped.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let value = value.into();
        if !value.is_empty() {
            self.cells.insert(column.into(), value);
        }
    }

    /// Value at `column`, or [`CellValue::Empty`] when absent.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Convert a 0-based column index into its spreadsheet letter (`0 -> "A"`, `26 -> "AA"`).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Logical record fields a spreadsheet column can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// Business identifier (tax id in the default template).
    Identifier,
    /// Display name; becomes the record title.
    Name,
    /// Primary phone number.
    PhonePrimary,
    /// Secondary phone number.
    PhoneSecondary,
    /// Contact email.
    Email,
}

/// Row fields after normalization.
///
/// `identifier` and `name` are trimmed and hold no line breaks; phones contain only ASCII
/// digits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedFields {
    pub identifier: String,
    pub name: String,
    pub phone_primary: Option<String>,
    pub phone_secondary: Option<String>,
    pub email: Option<String>,
}

impl NormalizedFields {
    /// Rows with neither identifier nor name carry nothing worth importing.
    pub fn should_skip(&self) -> bool {
        self.identifier.is_empty() && self.name.is_empty()
    }
}

/// Payload handed to the record store's create operation.
///
/// Optional fields that are absent are omitted from the serialized payload, never sent as
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    /// Record title (the row's name).
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Fixed status marker applied to every imported record.
    pub status: String,
}

/// Accounting for one import batch.
///
/// Only the ingestion loop advances an outcome; once returned it is final.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    imported: usize,
    skipped: usize,
    errors: Vec<String>,
    truncated: bool,
}

impl BatchOutcome {
    /// Number of records successfully persisted.
    pub fn imported(&self) -> usize {
        self.imported
    }

    /// Number of rows skipped because they had neither identifier nor name.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Every recorded row failure, in row order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// True if processing stopped early because the error budget was exhausted.
    pub fn truncated_errors(&self) -> bool {
        self.truncated
    }

    pub(crate) fn record_skip(mut self) -> Self {
        self.skipped += 1;
        self
    }

    pub(crate) fn record_import(mut self) -> Self {
        self.imported += 1;
        self
    }

    pub(crate) fn record_failure(mut self, message: String) -> Self {
        self.errors.push(message);
        self
    }

    pub(crate) fn mark_truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        imported: usize,
        skipped: usize,
        errors: Vec<String>,
        truncated: bool,
    ) -> Self {
        Self {
            imported,
            skipped,
            errors,
            truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_follow_spreadsheet_naming() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(2), "C");
        assert_eq!(column_letter(14), "O");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(52), "BA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(11988887777.0).to_string(), "11988887777");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let row = RawRow::new().with("A", "x").with("B", "");
        assert_eq!(row.get("A"), &CellValue::Text("x".to_string()));
        assert_eq!(row.get("B"), &CellValue::Empty);
        assert_eq!(row.get("Q"), &CellValue::Empty);
    }
}
