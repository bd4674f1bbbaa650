use std::collections::HashSet;
use std::sync::Mutex;

use sheet_import::error::StoreError;
use sheet_import::ingestion::{DEFAULT_ERROR_BUDGET, ImportLimits, run_rows};
use sheet_import::processing::RowMapper;
use sheet_import::store::RecordStore;
use sheet_import::types::{RawRow, TargetRecord};

/// Accepts every record except those whose name is listed in `reject`.
#[derive(Default)]
struct ScriptedStore {
    reject: HashSet<String>,
    reject_all: bool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedStore {
    fn rejecting(names: &[&str]) -> Self {
        Self {
            reject: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    fn rejecting_all() -> Self {
        Self {
            reject_all: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RecordStore for ScriptedStore {
    fn create_record(&self, record: &TargetRecord) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(record.name.clone());
        if self.reject_all || self.reject.contains(&record.name) {
            Err(StoreError::new(format!("rejected {}", record.name)))
        } else {
            Ok(())
        }
    }
}

fn company(name: &str) -> RawRow {
    RawRow::new().with("A", format!("id-{name}")).with("C", name)
}

fn blank_with_contacts() -> RawRow {
    RawRow::new()
        .with("A", "  ")
        .with("C", "")
        .with("M", "(11) 98888-7777")
        .with("N", "(11) 3333-4444")
        .with("O", "someone@example.com")
}

fn run(rows: &[RawRow], store: &ScriptedStore) -> sheet_import::types::BatchOutcome {
    run_rows(rows, &RowMapper::default(), store, &ImportLimits::default(), None)
}

#[test]
fn skipped_rows_never_reach_the_store() {
    let rows = vec![company("a"), blank_with_contacts(), company("b"), blank_with_contacts()];
    let store = ScriptedStore::default();

    let outcome = run(&rows, &store);

    assert_eq!(outcome.imported(), 2);
    assert_eq!(outcome.skipped(), 2);
    assert!(outcome.errors().is_empty());
    assert_eq!(store.calls(), vec!["a", "b"]);
}

#[test]
fn failures_report_display_line_and_processing_continues() {
    let rows = vec![company("a"), company("b"), blank_with_contacts(), company("c"), company("d")];
    let store = ScriptedStore::rejecting(&["b", "d"]);

    let outcome = run(&rows, &store);

    assert_eq!(outcome.imported(), 2);
    assert_eq!(outcome.skipped(), 1);
    // ordinal 1 -> line 3, ordinal 4 -> line 6
    assert_eq!(outcome.errors(), ["Line 3: rejected b", "Line 6: rejected d"]);
    assert!(!outcome.truncated_errors());
    assert_eq!(store.calls(), vec!["a", "b", "c", "d"]);
}

#[test]
fn stops_right_after_budget_is_exceeded() {
    let rows: Vec<RawRow> = (0..15).map(|i| company(&format!("row{i}"))).collect();
    let store = ScriptedStore::rejecting_all();

    let outcome = run(&rows, &store);

    assert_eq!(outcome.errors().len(), DEFAULT_ERROR_BUDGET + 1);
    assert!(outcome.truncated_errors());
    assert_eq!(outcome.imported(), 0);
    assert_eq!(store.calls().len(), 11);
    assert_eq!(outcome.errors().last().unwrap(), "Line 12: rejected row10");
}

#[test]
fn exactly_budget_failures_do_not_truncate() {
    let mut rows: Vec<RawRow> = (0..10).map(|i| company(&format!("bad{i}"))).collect();
    rows.push(company("good"));
    let rejected: Vec<String> = (0..10).map(|i| format!("bad{i}")).collect();
    let rejected: Vec<&str> = rejected.iter().map(String::as_str).collect();
    let store = ScriptedStore::rejecting(&rejected);

    let outcome = run(&rows, &store);

    assert_eq!(outcome.errors().len(), 10);
    assert!(!outcome.truncated_errors());
    assert_eq!(outcome.imported(), 1);
    assert_eq!(store.calls().len(), 11);
}

#[test]
fn rows_after_the_stop_point_are_never_attempted() {
    // Two good rows, then eleven failing rows, then a good row that must not be tried.
    let mut rows = vec![company("ok1"), company("ok2")];
    rows.extend((0..11).map(|i| company(&format!("bad{i}"))));
    rows.push(company("late"));
    let rejected: Vec<String> = (0..11).map(|i| format!("bad{i}")).collect();
    let rejected: Vec<&str> = rejected.iter().map(String::as_str).collect();
    let store = ScriptedStore::rejecting(&rejected);

    let outcome = run(&rows, &store);

    assert!(outcome.truncated_errors());
    assert_eq!(outcome.imported(), 2);
    assert_eq!(outcome.errors().len(), 11);
    assert_eq!(outcome.errors()[0], "Line 4: rejected bad0");
    assert!(!store.calls().contains(&"late".to_string()));
}

#[test]
fn never_consumes_more_than_the_row_cap() {
    let rows: Vec<RawRow> = (0..1_200)
        .map(|i| if i % 3 == 0 { blank_with_contacts() } else { company(&format!("c{i}")) })
        .collect();
    let store = ScriptedStore::default();

    let outcome = run(&rows, &store);

    let accounted = outcome.imported() + outcome.skipped() + outcome.errors().len();
    assert_eq!(accounted, 1_000);
    assert_eq!(outcome.skipped(), 334);
    assert_eq!(store.calls().len(), 666);
}

#[test]
fn accounting_never_exceeds_consumed_rows() {
    let rows: Vec<RawRow> = (0..40)
        .map(|i| if i % 4 == 0 { blank_with_contacts() } else { company(&format!("c{i}")) })
        .collect();
    let rejected: Vec<String> = (0..40).filter(|i| i % 5 == 0).map(|i| format!("c{i}")).collect();
    let rejected: Vec<&str> = rejected.iter().map(String::as_str).collect();
    let store = ScriptedStore::rejecting(&rejected);

    let outcome = run(&rows, &store);

    let accounted = outcome.imported() + outcome.skipped() + outcome.errors().len();
    assert!(accounted <= rows.len());
    assert!(!outcome.truncated_errors());
    assert_eq!(accounted, rows.len());
}
