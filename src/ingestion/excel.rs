#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::error::{ImportError, ImportResult};
use crate::types::{CellValue, RawRow, column_letter};

/// Decode the first sheet of an in-memory workbook (`.xlsx`, `.xls`, `.xlsb`, `.ods`, ...).
///
/// Behavior:
/// - Only the first sheet in workbook order is read
/// - Rows start at the sheet's used range; the first one is the header and is returned as row 0
/// - Cells are keyed by their absolute column letter, so a sheet whose data starts in column B
///   still reports that column as `"B"`
/// - Error cells (`#N/A`, `#REF!`, ...) read as empty
pub fn read_first_sheet(bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::EmptyWorkbook)?;
    let range = workbook.worksheet_range(&sheet)?;

    Ok(rows_from_range(&range))
}

fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let first_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    range
        .rows()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(idx, cell)| (column_letter(first_col + idx), cell_value(cell)))
                .collect()
        })
        .collect()
}

fn cell_value(c: &Data) -> CellValue {
    match c {
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Text(dt.to_string()),
        Data::DateTimeIso(s) => CellValue::from(s.as_str()),
        Data::DurationIso(s) => CellValue::from(s.as_str()),
        Data::Error(_) => CellValue::Empty,
        Data::Empty => CellValue::Empty,
    }
}
