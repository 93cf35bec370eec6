//! Bulk submission of validated drafts.

use std::time::Instant;

use tracing::{info, warn};

use crate::config::ImportConfig;
use crate::error::{ImportError, ImportResult};
use crate::models::{BulkSubmissionResult, RecordError, RecordErrorKind, ValidationResult};

use super::payload::{BulkSubmissionRequest, BulkSubmissionResponse, EntryPayload, StoreRecordError};
use super::sink::{DUPLICATE_ENTRY_CODE, EntrySink, SinkError};

/// Message fragments (compared lowercase) by which stores report a unique
/// (employee, period) conflict.
pub const DUPLICATE_MARKERS: &[&str] = &[
    "duplicate",
    "already exists",
    "unique constraint",
    "unique_violation",
    "重复",
    "已存在",
];

/// Error codes by which stores report a unique conflict. `23505` is the
/// PostgreSQL unique violation.
pub const DUPLICATE_CODES: &[&str] = &[DUPLICATE_ENTRY_CODE, "23505", "UNIQUE_VIOLATION"];

/// Classifies a per-record store rejection.
///
/// # Example
///
/// ```
/// use payroll_import::batch::classify_record_error;
/// use payroll_import::models::RecordErrorKind;
///
/// assert_eq!(classify_record_error("Duplicate key value", None), RecordErrorKind::Duplicate);
/// assert_eq!(classify_record_error("employee not found", None), RecordErrorKind::Other);
/// ```
pub fn classify_record_error(message: &str, code: Option<&str>) -> RecordErrorKind {
    let lower = message.to_lowercase();
    let by_code = code.is_some_and(|code| DUPLICATE_CODES.iter().any(|c| c.eq_ignore_ascii_case(code)));
    if by_code || DUPLICATE_MARKERS.iter().any(|marker| lower.contains(marker)) {
        RecordErrorKind::Duplicate
    } else {
        RecordErrorKind::Other
    }
}

fn reconcile_record_error(error: StoreRecordError) -> RecordError {
    let kind = classify_record_error(&error.error, error.code.as_deref());
    let message = match kind {
        RecordErrorKind::Duplicate => format!(
            "{}; resubmit with overwrite mode enabled to update the existing entry",
            error.error
        ),
        RecordErrorKind::Other => error.error,
    };
    RecordError {
        employee_ref: error.employee_ref,
        error: message,
        kind,
    }
}

fn reconcile(response: BulkSubmissionResponse) -> BulkSubmissionResult {
    let errors: Vec<RecordError> = response
        .errors
        .into_iter()
        .map(reconcile_record_error)
        .collect();
    BulkSubmissionResult {
        success_count: response.success_count.max(response.created_entries.len()),
        error_count: response.error_count.max(errors.len()),
        errors,
        created_entries: response.created_entries,
    }
}

/// Turns validated drafts into one atomic bulk request and dispatches it.
///
/// The orchestrator is the only writer to the store. It never retries: a
/// failed call is reported and the operator decides what to resubmit.
pub struct BatchOrchestrator<S> {
    sink: S,
    config: ImportConfig,
}

impl<S: EntrySink> BatchOrchestrator<S> {
    /// Creates an orchestrator. Period gating follows `config`.
    pub fn new(sink: S, config: ImportConfig) -> Self {
        Self { sink, config }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Submits every valid draft in one call.
    ///
    /// Fails before any network call with `NoValidRecords` when nothing is
    /// valid, `NoPeriodSelected` when no period is given and
    /// `PeriodNotImportable` when the configuration closes the period. A
    /// store-wide duplicate conflict becomes `DuplicateRecord`; any other
    /// store failure becomes `SubmissionFailed`.
    pub async fn submit(
        &self,
        results: &[ValidationResult],
        period_id: Option<&str>,
        overwrite_mode: bool,
    ) -> ImportResult<BulkSubmissionResult> {
        let entries: Vec<EntryPayload> = results
            .iter()
            .filter(|result| result.is_valid)
            .map(|result| EntryPayload::from(&result.draft))
            .collect();

        if entries.is_empty() {
            return Err(ImportError::NoValidRecords {
                total: results.len(),
            });
        }

        let period_id = period_id
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(ImportError::NoPeriodSelected)?;

        if !self.config.is_period_importable(period_id) {
            return Err(ImportError::PeriodNotImportable {
                period_id: period_id.to_string(),
            });
        }

        let entry_count = entries.len();
        let request = BulkSubmissionRequest {
            period_id: period_id.to_string(),
            overwrite_mode,
            entries,
        };

        info!(
            period_id = %period_id,
            entries = entry_count,
            skipped = results.len() - entry_count,
            overwrite_mode,
            "Submitting payroll entries"
        );

        let start = Instant::now();
        let response = self
            .sink
            .submit_bulk_entries(request)
            .await
            .map_err(|err| {
                warn!(period_id = %period_id, error = %err, "Bulk submission failed");
                match err {
                    SinkError::Duplicate { message } => ImportError::DuplicateRecord { message },
                    SinkError::Failed { message } => ImportError::SubmissionFailed { message },
                }
            })?;

        let result = reconcile(response);
        let duration_ms = start.elapsed().as_millis() as u64;
        if result.error_count > 0 {
            warn!(
                period_id = %period_id,
                success_count = result.success_count,
                error_count = result.error_count,
                recoverable = result.all_errors_recoverable(),
                duration_ms,
                "Bulk submission partially rejected"
            );
        } else {
            info!(
                period_id = %period_id,
                success_count = result.success_count,
                duration_ms,
                "Bulk submission completed"
            );
        }
        Ok(result)
    }
}
