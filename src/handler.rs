//! Request-level import handler.
//!
//! Turns an upload into an HTTP-style status and JSON body. Transport concerns (method checks,
//! CORS, multipart decoding) belong to the caller; this module only applies the import rules:
//!
//! - store configuration is resolved first; a missing credential is a `500`
//! - no `file` part is a `400`
//! - an undecodable file is a `500`
//! - a batch that ran (even with row failures or an early stop) is a `200`

use serde::Serialize;

use crate::error::{ImportError, ImportResult};
use crate::ingestion::{BatchReport, ImportOptions, UploadPart, import_upload, report_with_limit};
use crate::store::RecordStore;

/// Body of an [`ImportResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// The batch ran to completion or to its error budget.
    Report(BatchReport),
    /// The request was rejected before or while decoding.
    Failure { success: bool, error: String },
}

/// Status code plus JSON body for the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ImportResponse {
    fn report(report: BatchReport) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Report(report),
        }
    }

    fn failure(error: &ImportError) -> Self {
        Self {
            status: error.status_code(),
            body: ResponseBody::Failure {
                success: false,
                error: error.to_string(),
            },
        }
    }

    /// Serialize the body as JSON text.
    pub fn body_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }
}

/// Handle one import request.
///
/// `connect` builds the record store (typically from environment configuration). It runs
/// before the upload is inspected, so configuration failures never read any rows.
pub fn handle_import<S, C>(
    connect: C,
    parts: &[UploadPart],
    options: &ImportOptions,
) -> ImportResponse
where
    S: RecordStore,
    C: FnOnce() -> ImportResult<S>,
{
    let result = connect().and_then(|store| import_upload(parts, &store, options));

    match result {
        Ok(outcome) => {
            ImportResponse::report(report_with_limit(&outcome, options.limits.reported_errors))
        }
        Err(err) => {
            if let Some(obs) = &options.observer {
                obs.on_batch_failed(&err);
            }
            ImportResponse::failure(&err)
        }
    }
}
