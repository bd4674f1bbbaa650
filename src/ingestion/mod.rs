//! Upload decoding and the ingestion loop.
//!
//! Most callers should use [`import_upload`] (from [`unified`]) which:
//!
//! - finds the `file` part and detects its format (or you can force one via [`ImportOptions`])
//! - decodes the first sheet into [`crate::types::RawRow`]s
//! - runs [`run_rows`], reporting progress to an optional [`ImportObserver`]
//!
//! Format-specific decoders are also available under:
//! - [`csv`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod unified;

pub use observability::{CompositeObserver, ImportObserver, LogObserver};
pub use pipeline::{
    DEFAULT_ERROR_BUDGET, DEFAULT_MAX_ROWS, DEFAULT_REPORTED_ERRORS, ImportLimits, run_rows,
};
pub use report::{BatchReport, report, report_with_limit};
pub use unified::{
    FILE_PART_NAME, ImportOptions, SheetFormat, UploadPart, decode_rows, find_file_part,
    import_upload,
};
