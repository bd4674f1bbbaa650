//! `sheet-import` ingests an uploaded spreadsheet and creates one record per row in an external
//! store (a Notion database by default), reporting how many rows were imported, skipped, or
//! failed.
//!
//! The primary entrypoint is [`handler::handle_import`], which takes the decoded parts of a
//! multipart upload and returns a status code plus JSON body. Library users that want the raw
//! accounting can call [`ingestion::import_upload`] directly.
//!
//! ## Pipeline
//!
//! 1. **Decode**: the `file` part is read as CSV or (feature `excel`) a workbook; the first
//!    sheet becomes [`types::RawRow`]s keyed by column letter, header first.
//! 2. **Map**: [`processing::RowMapper`] pulls identifier/name/phones/email from columns
//!    A/C/M/N/O, trims text, strips phones to digits, and skips rows without identifier and
//!    name.
//! 3. **Persist**: [`ingestion::run_rows`] sends each record to a [`store::RecordStore`] in
//!    order. A failed row is recorded as `"Line <n>: <reason>"` and the loop moves on, up to
//!    1000 rows and until more than 10 rows have failed.
//! 4. **Report**: [`ingestion::report`] builds `{ success, imported, skipped, errors? }` with at
//!    most 5 error messages.
//!
//! ## Quick example
//!
//! ```rust
//! use sheet_import::error::StoreError;
//! use sheet_import::handler::handle_import;
//! use sheet_import::ingestion::{ImportOptions, UploadPart};
//! use sheet_import::types::TargetRecord;
//!
//! let csv = "cnpj,tipo,empresa\n11.222.333/0001-44,x,ACME\n".as_bytes().to_vec();
//! let parts = vec![UploadPart::new("file", Some("leads.csv".to_string()), csv)];
//!
//! let store = |record: &TargetRecord| -> Result<(), StoreError> {
//!     assert_eq!(record.name, "ACME");
//!     Ok(())
//! };
//! let response = handle_import(|| Ok(store), &parts, &ImportOptions::default());
//!
//! assert_eq!(response.status, 200);
//! assert_eq!(
//!     response.body_json().unwrap(),
//!     r#"{"success":true,"imported":1,"skipped":0}"#
//! );
//! ```
//!
//! ## Modules
//!
//! - [`handler`]: request-level entrypoint and status mapping
//! - [`ingestion`]: decoders, the ingestion loop, observers, and the batch report
//! - [`processing`]: cell normalization and row mapping
//! - [`store`]: the record store trait plus Notion (feature `notion`) and dry-run stores
//! - [`config`]: store credentials
//! - [`types`]: rows, records, and batch outcome
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod handler;
pub mod ingestion;
pub mod processing;
pub mod store;
pub mod types;

pub use error::{ImportError, ImportResult, StoreError};
