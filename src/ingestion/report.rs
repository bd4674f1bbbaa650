//! Batch summary for the response body.

use serde::Serialize;

use crate::types::BatchOutcome;

use super::pipeline::DEFAULT_REPORTED_ERRORS;

/// Summary returned to the uploader after a completed batch.
///
/// Serializes as `{ "success": true, "imported": n, "skipped": n, "errors": [...] }`; the
/// `errors` key is left out when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub success: bool,
    pub imported: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Build the report for `outcome`, keeping the first five error messages.
pub fn report(outcome: &BatchOutcome) -> BatchReport {
    report_with_limit(outcome, DEFAULT_REPORTED_ERRORS)
}

/// Build the report for `outcome`, keeping at most `max_errors` error messages.
pub fn report_with_limit(outcome: &BatchOutcome, max_errors: usize) -> BatchReport {
    let errors = outcome.errors();
    BatchReport {
        success: true,
        imported: outcome.imported(),
        skipped: outcome.skipped(),
        errors: if errors.is_empty() {
            None
        } else {
            Some(errors.iter().take(max_errors).cloned().collect())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{report, report_with_limit};
    use crate::types::BatchOutcome;

    #[test]
    fn clean_run_omits_errors_key() {
        let outcome = BatchOutcome::from_parts(2, 1, Vec::new(), false);
        let json = serde_json::to_value(report(&outcome)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "imported": 2, "skipped": 1 })
        );
    }

    #[test]
    fn keeps_only_first_five_errors() {
        let errors: Vec<String> = (2..13).map(|line| format!("Line {line}: boom")).collect();
        let outcome = BatchOutcome::from_parts(0, 0, errors, true);

        let r = report(&outcome);
        let reported = r.errors.unwrap();
        assert_eq!(reported.len(), 5);
        assert_eq!(reported[0], "Line 2: boom");
        assert_eq!(reported[4], "Line 6: boom");
    }

    #[test]
    fn custom_limit_is_respected() {
        let errors = vec!["Line 3: x".to_string(), "Line 4: y".to_string()];
        let outcome = BatchOutcome::from_parts(1, 0, errors, false);
        assert_eq!(report_with_limit(&outcome, 1).errors, Some(vec!["Line 3: x".to_string()]));
    }
}
