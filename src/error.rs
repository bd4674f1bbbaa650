use thiserror::Error;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type for failures that abort a whole import request.
///
/// Row-level persistence failures are not represented here; they are recorded as
/// [`StoreError`]s inside the batch outcome and never abort the run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A required configuration value (credential or target id) is missing or blank.
    #[error("missing required configuration: {key}")]
    MissingConfig { key: &'static str },

    /// The upload did not contain a part named `file`.
    #[error("no file part named 'file' in upload")]
    MissingFile,

    #[cfg(feature = "excel")]
    /// Workbook decoding error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "notion")]
    /// HTTP client setup error (feature-gated behind `notion`).
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The workbook decoded fine but has no sheets to read.
    #[error("workbook has no sheets")]
    EmptyWorkbook,

    /// The upload could not be matched to a decodable format.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },
}

impl ImportError {
    /// HTTP status code this error maps to when reported back to the uploader.
    ///
    /// Only a missing file part is the caller's fault; everything else is a server-side
    /// structural failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ImportError::MissingFile => 400,
            _ => 500,
        }
    }
}

/// Failure reported by a [`crate::store::RecordStore`] for a single record.
///
/// The message is surfaced verbatim in the batch error list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
