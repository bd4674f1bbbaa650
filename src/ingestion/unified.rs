//! Unified upload import entrypoint.
//!
//! Most callers should use [`import_upload`], which finds the `file` part of an upload, decodes
//! its first sheet, and runs the ingestion loop against a [`RecordStore`].
//!
//! - If [`ImportOptions::format`] is `None`, the format is inferred from the part's file name,
//!   then from the leading bytes.
//! - If an [`ImportObserver`] is provided, row and batch events are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ImportError, ImportResult};
use crate::processing::{ColumnMapping, DEFAULT_STATUS, RowMapper};
use crate::store::RecordStore;
use crate::types::{BatchOutcome, RawRow};

use super::csv;
use super::observability::ImportObserver;
use super::pipeline::{ImportLimits, run_rows};

/// Name of the multipart field that carries the spreadsheet.
pub const FILE_PART_NAME: &str = "file";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Comma- or semicolon-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl SheetFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Guess a format from leading bytes: zip (xlsx/ods) and OLE (xls) containers are
    /// workbooks, anything else is treated as CSV.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            Self::Excel
        } else {
            Self::Csv
        }
    }
}

/// One decoded part of a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadPart {
    /// Form field name.
    pub name: String,
    /// Client-side file name, when the part carried one.
    pub filename: Option<String>,
    /// Raw part body.
    pub data: Vec<u8>,
}

impl UploadPart {
    pub fn new(name: impl Into<String>, filename: Option<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            filename,
            data,
        }
    }

    /// Format of this part: file-name extension first, then content sniffing.
    pub fn detect_format(&self) -> SheetFormat {
        self.filename
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .and_then(SheetFormat::from_extension)
            .unwrap_or_else(|| SheetFormat::sniff(&self.data))
    }
}

impl fmt::Debug for UploadPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadPart")
            .field("name", &self.name)
            .field("filename", &self.filename)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Options controlling an import.
///
/// Use [`Default`] for the production template (columns A/C/M/N/O, status `"Entrada"`,
/// 1000 rows, error budget 10, 5 reported errors).
#[derive(Clone)]
pub struct ImportOptions {
    /// If `None`, detect the format from the upload.
    pub format: Option<SheetFormat>,
    /// Spreadsheet column to record field bindings.
    pub columns: ColumnMapping,
    /// Status marker set on every created record.
    pub status: String,
    /// Row cap, error budget and report size.
    pub limits: ImportLimits,
    /// Optional observer for logging/metrics.
    pub observer: Option<Arc<dyn ImportObserver>>,
}

impl ImportOptions {
    /// Row mapper configured from these options.
    pub fn row_mapper(&self) -> RowMapper {
        RowMapper::new(self.columns.clone(), self.status.clone())
    }
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("format", &self.format)
            .field("columns", &self.columns)
            .field("status", &self.status)
            .field("limits", &self.limits)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            format: None,
            columns: ColumnMapping::default(),
            status: DEFAULT_STATUS.to_string(),
            limits: ImportLimits::default(),
            observer: None,
        }
    }
}

/// Find the part named `file`.
pub fn find_file_part(parts: &[UploadPart]) -> ImportResult<&UploadPart> {
    parts
        .iter()
        .find(|p| p.name == FILE_PART_NAME)
        .ok_or(ImportError::MissingFile)
}

/// Decode upload bytes into rows, header included at index 0.
pub fn decode_rows(bytes: &[u8], format: SheetFormat) -> ImportResult<Vec<RawRow>> {
    match format {
        SheetFormat::Csv => csv::read_csv_rows(bytes),
        SheetFormat::Excel => decode_excel(bytes),
    }
}

fn decode_excel(bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
    #[cfg(feature = "excel")]
    {
        super::excel::read_first_sheet(bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = bytes;
        Err(ImportError::UnsupportedFormat {
            message: "excel decoding not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

/// Import the spreadsheet carried by `parts` into `store`.
///
/// Fails without touching the store when the `file` part is missing or cannot be decoded.
/// Row-level store failures never fail the call; they are counted in the returned
/// [`BatchOutcome`].
///
/// # Examples
///
/// ```
/// use sheet_import::error::StoreError;
/// use sheet_import::ingestion::{import_upload, ImportOptions, UploadPart};
/// use sheet_import::types::TargetRecord;
///
/// let csv = "cnpj,tipo,empresa\n123,x,ACME\n,,\n".as_bytes().to_vec();
/// let parts = vec![UploadPart::new("file", Some("leads.csv".to_string()), csv)];
/// let store = |_: &TargetRecord| -> Result<(), StoreError> { Ok(()) };
///
/// let outcome = import_upload(&parts, &store, &ImportOptions::default()).unwrap();
/// assert_eq!(outcome.imported(), 1);
/// assert_eq!(outcome.skipped(), 1);
/// ```
pub fn import_upload<S>(
    parts: &[UploadPart],
    store: &S,
    options: &ImportOptions,
) -> ImportResult<BatchOutcome>
where
    S: RecordStore + ?Sized,
{
    let file = find_file_part(parts)?;
    let format = options.format.unwrap_or_else(|| file.detect_format());
    let rows = decode_rows(&file.data, format)?;

    let data_rows = rows.get(1..).unwrap_or_default();
    Ok(run_rows(
        data_rows,
        &options.row_mapper(),
        store,
        &options.limits,
        options.observer.as_deref(),
    ))
}
