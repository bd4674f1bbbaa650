//! The fault-tolerant ingestion loop.

use std::ops::ControlFlow;

use crate::processing::{RowDecision, RowMapper};
use crate::store::RecordStore;
use crate::types::{BatchOutcome, RawRow};

use super::observability::ImportObserver;

/// Maximum number of data rows read from one upload.
pub const DEFAULT_MAX_ROWS: usize = 1_000;

/// Number of row failures tolerated; the batch stops as soon as this many is exceeded.
pub const DEFAULT_ERROR_BUDGET: usize = 10;

/// Number of error messages included in the response.
pub const DEFAULT_REPORTED_ERRORS: usize = 5;

/// Spreadsheet line of the first data row; line 1 is the header.
const FIRST_DATA_LINE: usize = 2;

/// Bounds on the work a single batch may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportLimits {
    /// Data rows beyond this count are never inspected.
    pub max_rows: usize,
    /// Processing stops once `errors.len() > error_budget`.
    pub error_budget: usize,
    /// Maximum error messages in the final report.
    pub reported_errors: usize,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            error_budget: DEFAULT_ERROR_BUDGET,
            reported_errors: DEFAULT_REPORTED_ERRORS,
        }
    }
}

/// Map and persist `rows` (data rows only, header already removed) in order.
///
/// - Rows the mapper skips count as skipped and never reach the store.
/// - A store failure is recorded as `"Line <n>: <reason>"` and processing continues.
/// - Once more than `limits.error_budget` failures are recorded the loop stops and the outcome
///   is marked truncated.
///
/// Store calls are strictly sequential; no store error escapes this function.
pub fn run_rows<S>(
    rows: &[RawRow],
    mapper: &RowMapper,
    store: &S,
    limits: &ImportLimits,
    observer: Option<&dyn ImportObserver>,
) -> BatchOutcome
where
    S: RecordStore + ?Sized,
{
    let window = &rows[..rows.len().min(limits.max_rows)];

    let flow = window
        .iter()
        .enumerate()
        .try_fold(BatchOutcome::default(), |outcome, (idx, row)| {
            let line = idx + FIRST_DATA_LINE;

            let record = match mapper.map_row(row) {
                RowDecision::Skip => {
                    if let Some(obs) = observer {
                        obs.on_row_skipped(line);
                    }
                    return ControlFlow::Continue(outcome.record_skip());
                }
                RowDecision::Record(record) => record,
            };

            match store.create_record(&record) {
                Ok(()) => {
                    if let Some(obs) = observer {
                        obs.on_row_imported(line, &record);
                    }
                    ControlFlow::Continue(outcome.record_import())
                }
                Err(err) => {
                    if let Some(obs) = observer {
                        obs.on_row_failed(line, &err);
                    }
                    let outcome = outcome.record_failure(format!("Line {line}: {err}"));
                    if outcome.errors().len() > limits.error_budget {
                        ControlFlow::Break(outcome.mark_truncated())
                    } else {
                        ControlFlow::Continue(outcome)
                    }
                }
            }
        });

    let outcome = match flow {
        ControlFlow::Continue(outcome) | ControlFlow::Break(outcome) => outcome,
    };

    if let Some(obs) = observer {
        obs.on_batch_finished(&outcome);
    }
    outcome
}
