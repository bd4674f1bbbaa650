//! CSV decoding.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;

use crate::error::ImportResult;
use crate::types::{RawRow, column_letter};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode CSV bytes into rows keyed by column letter.
///
/// Rules:
///
/// - The header line is returned as row 0, like any other row.
/// - Rows may have different lengths; missing trailing cells read as empty.
/// - The delimiter is `;` when the first line has more semicolons than commas, `,` otherwise.
/// - Blank lines between the header and the last record are kept as empty rows, the same way a
///   blank row inside a worksheet reads, so row ordinals match the file's line numbers.
/// - Each field is read as UTF-8 and falls back to Windows-1252 when it is not valid UTF-8
///   (legacy Excel "CSV" exports). A leading UTF-8 BOM is dropped.
pub fn read_csv_rows(bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(bytes))
        .from_reader(bytes);

    let mut rows: Vec<RawRow> = Vec::new();
    let mut record = csv::ByteRecord::new();
    loop {
        // The reader skips blank lines silently; its offset before the read marks the gap.
        let offset = usize::try_from(rdr.position().byte()).unwrap_or(bytes.len());
        if !rdr.read_byte_record(&mut record)? {
            break;
        }
        let first_record = rows.is_empty();
        if !first_record {
            rows.extend((0..blank_lines_at(bytes, offset)).map(|_| RawRow::new()));
        }
        rows.push(decode_record(&record, first_record));
    }
    Ok(rows)
}

fn decode_record(record: &csv::ByteRecord, first_record: bool) -> RawRow {
    record
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let raw = if first_record && idx == 0 {
                raw.strip_prefix(UTF8_BOM).unwrap_or(raw)
            } else {
                raw
            };
            (column_letter(idx), decode_field(raw).into_owned())
        })
        .collect()
}

/// Number of blank lines in the run of line terminators surrounding `offset`.
///
/// The run starts after the previous record's last content byte, so it always includes that
/// record's own terminator. Unquoted fields cannot hold `\r`/`\n` and quoted ones end in `"`,
/// which keeps the backward scan inside the terminator run.
fn blank_lines_at(bytes: &[u8], offset: usize) -> usize {
    let offset = offset.min(bytes.len());
    let is_break = |b: &&u8| **b == b'\r' || **b == b'\n';
    let back = bytes[..offset].iter().rev().take_while(is_break).count();
    let ahead = bytes[offset..].iter().take_while(is_break).count();
    let run = &bytes[offset - back..offset + ahead];

    let breaks = run
        .iter()
        .enumerate()
        .filter(|(i, b)| **b == b'\n' || (**b == b'\r' && run.get(i + 1) != Some(&b'\n')))
        .count();
    breaks.saturating_sub(1)
}

fn decode_field(field: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(field) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(field).0,
    }
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    if semicolons > commas { b';' } else { b',' }
}
