//! Row mapping: raw spreadsheet row → normalized fields → [`TargetRecord`].

use crate::types::{EMPTY_CELL, NormalizedFields, RawRow, RecordField, TargetRecord};

use super::normalize::{clean_email, clean_phone, trim};

/// Status marker set on every record created by an import.
pub const DEFAULT_STATUS: &str = "Entrada";

/// Binds one spreadsheet column to a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// Column letter, e.g. `"A"`.
    pub column: String,
    /// Field the column feeds.
    pub field: RecordField,
}

impl ColumnBinding {
    pub fn new(column: impl Into<String>, field: RecordField) -> Self {
        Self {
            column: column.into(),
            field,
        }
    }
}

/// Ordered list of column bindings.
///
/// The default matches the upstream spreadsheet template: identifier in `A`, name in `C`,
/// phones in `M` and `N`, email in `O`. If a field is bound more than once, the last binding
/// wins; an unbound field reads as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub bindings: Vec<ColumnBinding>,
}

impl ColumnMapping {
    pub fn new(bindings: Vec<ColumnBinding>) -> Self {
        Self { bindings }
    }

    /// Column letter bound to `field`, if any.
    pub fn column_for(&self, field: RecordField) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.field == field)
            .map(|b| b.column.as_str())
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::new(vec![
            ColumnBinding::new("A", RecordField::Identifier),
            ColumnBinding::new("C", RecordField::Name),
            ColumnBinding::new("M", RecordField::PhonePrimary),
            ColumnBinding::new("N", RecordField::PhoneSecondary),
            ColumnBinding::new("O", RecordField::Email),
        ])
    }
}

/// Result of mapping one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDecision {
    /// Row has neither identifier nor name.
    Skip,
    /// Row should be persisted as this record.
    Record(TargetRecord),
}

/// Turns raw rows into store records using a [`ColumnMapping`] and a status marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMapper {
    columns: ColumnMapping,
    status: String,
}

impl RowMapper {
    pub fn new(columns: ColumnMapping, status: impl Into<String>) -> Self {
        Self {
            columns,
            status: status.into(),
        }
    }

    /// Extract and normalize the bound fields of `row`.
    pub fn normalize(&self, row: &RawRow) -> NormalizedFields {
        let cell = |field: RecordField| match self.columns.column_for(field) {
            Some(column) => row.get(column),
            None => &EMPTY_CELL,
        };

        NormalizedFields {
            identifier: trim(cell(RecordField::Identifier)),
            name: trim(cell(RecordField::Name)),
            phone_primary: clean_phone(cell(RecordField::PhonePrimary)),
            phone_secondary: clean_phone(cell(RecordField::PhoneSecondary)),
            email: clean_email(cell(RecordField::Email)),
        }
    }

    /// Decide whether `row` is skipped or which record it becomes. Never fails.
    pub fn map_row(&self, row: &RawRow) -> RowDecision {
        let fields = self.normalize(row);
        if fields.should_skip() {
            return RowDecision::Skip;
        }

        RowDecision::Record(TargetRecord {
            name: fields.name,
            identifier: Some(fields.identifier).filter(|s| !s.is_empty()),
            phone_primary: fields.phone_primary,
            phone_secondary: fields.phone_secondary,
            email: fields.email,
            status: self.status.clone(),
        })
    }
}

impl Default for RowMapper {
    fn default() -> Self {
        Self::new(ColumnMapping::default(), DEFAULT_STATUS)
    }
}
