//! Cell normalization helpers.
//!
//! All functions are total: malformed or missing cells degrade to `""` / `None`.

use crate::types::CellValue;

/// Render a cell as text with leading/trailing whitespace removed. Empty cells become `""`.
///
/// Line breaks inside the cell (Alt+Enter in Excel, quoted newlines in CSV) are folded: each
/// run of `\r`/`\n` becomes a single space, so the result is always one line.
pub fn trim(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => fold_line_breaks(s.trim()),
        other => fold_line_breaks(other.to_string().trim()),
    }
}

fn fold_line_breaks(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_break = false;
    for c in s.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
            }
            in_break = true;
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}

/// Strip every non-digit character from a phone cell.
///
/// Returns `None` when nothing is left. Length and country code are not checked; source
/// spreadsheets mix local, national and international formats.
pub fn clean_phone(value: &CellValue) -> Option<String> {
    let digits: String = value
        .to_string()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() { None } else { Some(digits) }
}

/// Trimmed email, or `None` when blank. The format is left for the store to judge.
pub fn clean_email(value: &CellValue) -> Option<String> {
    let email = trim(value);
    if email.is_empty() { None } else { Some(email) }
}
