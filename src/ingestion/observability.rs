use std::fmt;
use std::sync::Arc;

use crate::error::{ImportError, StoreError};
use crate::types::{BatchOutcome, TargetRecord};

/// Observer interface for import progress.
///
/// `line` is the 1-based spreadsheet line of the row (the header is line 1).
/// Implementors can record metrics, logs, or trigger alerts. Observers only watch; they cannot
/// influence the batch.
pub trait ImportObserver: Send + Sync {
    /// Called when a row has neither identifier nor name.
    fn on_row_skipped(&self, _line: usize) {}

    /// Called after the store accepted a record.
    fn on_row_imported(&self, _line: usize, _record: &TargetRecord) {}

    /// Called when the store rejected a record.
    fn on_row_failed(&self, _line: usize, _error: &StoreError) {}

    /// Called once the loop is done, whether it ran out of rows or exhausted its error budget.
    fn on_batch_finished(&self, _outcome: &BatchOutcome) {}

    /// Called when the request fails before or instead of running the loop.
    fn on_batch_failed(&self, _error: &ImportError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_row_skipped(&self, line: usize) {
        for o in &self.observers {
            o.on_row_skipped(line);
        }
    }

    fn on_row_imported(&self, line: usize, record: &TargetRecord) {
        for o in &self.observers {
            o.on_row_imported(line, record);
        }
    }

    fn on_row_failed(&self, line: usize, error: &StoreError) {
        for o in &self.observers {
            o.on_row_failed(line, error);
        }
    }

    fn on_batch_finished(&self, outcome: &BatchOutcome) {
        for o in &self.observers {
            o.on_batch_finished(outcome);
        }
    }

    fn on_batch_failed(&self, error: &ImportError) {
        for o in &self.observers {
            o.on_batch_failed(error);
        }
    }
}

/// Emits import events through the [`log`] facade under the `sheet_import` target.
#[derive(Debug, Default)]
pub struct LogObserver;

impl ImportObserver for LogObserver {
    fn on_row_skipped(&self, line: usize) {
        log::debug!(target: "sheet_import", "line {line}: skipped (no identifier or name)");
    }

    fn on_row_imported(&self, line: usize, record: &TargetRecord) {
        log::info!(target: "sheet_import", "line {line}: imported '{}'", record.name);
    }

    fn on_row_failed(&self, line: usize, error: &StoreError) {
        log::warn!(target: "sheet_import", "line {line}: store rejected record: {error}");
    }

    fn on_batch_finished(&self, outcome: &BatchOutcome) {
        log::info!(
            target: "sheet_import",
            "batch finished imported={} skipped={} errors={} truncated={}",
            outcome.imported(),
            outcome.skipped(),
            outcome.errors().len(),
            outcome.truncated_errors()
        );
    }

    fn on_batch_failed(&self, error: &ImportError) {
        log::error!(
            target: "sheet_import",
            "batch failed status={} err={error}",
            error.status_code()
        );
    }
}
