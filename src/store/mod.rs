//! Record persistence.
//!
//! The ingestion loop only sees the [`RecordStore`] trait. Closures of the shape
//! `Fn(&TargetRecord) -> Result<(), StoreError>` implement it, which keeps tests and one-off
//! integrations short.

#[cfg(feature = "notion")]
pub mod notion;

use crate::error::StoreError;
use crate::types::TargetRecord;

#[cfg(feature = "notion")]
pub use notion::{NotionProperties, NotionStore, page_properties};

/// Create operation of the external record store.
pub trait RecordStore {
    /// Persist one record. The error message is shown to the uploader verbatim.
    fn create_record(&self, record: &TargetRecord) -> Result<(), StoreError>;
}

impl<F> RecordStore for F
where
    F: Fn(&TargetRecord) -> Result<(), StoreError>,
{
    fn create_record(&self, record: &TargetRecord) -> Result<(), StoreError> {
        self(record)
    }
}

/// Accepts every record without sending it anywhere, logging the payload instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunStore;

impl RecordStore for DryRunStore {
    fn create_record(&self, record: &TargetRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record).map_err(|e| StoreError::new(e.to_string()))?;
        log::info!(target: "sheet_import", "dry run: {payload}");
        Ok(())
    }
}
