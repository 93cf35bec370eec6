//! Plain-text import reports.
//!
//! The presentation layer renders these however it likes; the `Display`
//! implementation is the format written to logs and shown in terminals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::models::{BulkSubmissionResult, ValidationSummary};
use crate::pipeline::{ImportOutcome, PreparedImport};

/// A user-facing summary of one import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Validation counts and invalid records.
    pub validation: ValidationSummary,
    /// The store result, when the batch was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<BulkSubmissionResult>,
    /// True when the catalog was unavailable.
    pub catalog_degraded: bool,
    /// Why the batch was not submitted, if it was not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// True when resubmitting with overwrite mode would fix the failure.
    #[serde(default)]
    pub recoverable: bool,
}

impl ImportReport {
    /// A report for an import that has not been submitted.
    pub fn from_prepared(prepared: &PreparedImport) -> Self {
        Self {
            validation: prepared.validation_summary.clone(),
            catalog_degraded: prepared.catalog_degraded,
            ..Self::default()
        }
    }

    /// A report for a submitted import.
    pub fn from_outcome(outcome: &ImportOutcome) -> Self {
        Self {
            validation: outcome.validation_summary.clone(),
            submission: Some(outcome.submission_result.clone()),
            catalog_degraded: outcome.catalog_degraded,
            recoverable: outcome.submission_result.all_errors_recoverable(),
            failure: None,
        }
    }

    /// Records why submission failed.
    pub fn with_failure(mut self, error: &ImportError) -> Self {
        self.failure = Some(error.to_string());
        self.recoverable = error.is_recoverable();
        self
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.validation;
        writeln!(
            f,
            "Validated {} records: {} valid, {} invalid",
            v.total, v.valid, v.invalid
        )?;

        if self.catalog_degraded {
            writeln!(
                f,
                "Warning: component catalog unavailable, only base fields were mapped"
            )?;
        }

        if !v.ambiguous_fields.is_empty() {
            writeln!(f, "Columns needing manual mapping: {}", v.ambiguous_fields.join(", "))?;
        }

        for record in &v.invalid_records {
            let name = if record.full_name.is_empty() {
                "(no name)"
            } else {
                record.full_name.as_str()
            };
            writeln!(f, "  Row {} {}:", record.original_index + 1, name)?;
            for error in &record.errors {
                writeln!(f, "    - {}", error)?;
            }
        }

        if let Some(submission) = &self.submission {
            writeln!(
                f,
                "Submitted: {} saved, {} rejected",
                submission.success_count, submission.error_count
            )?;
            for error in &submission.errors {
                writeln!(f, "  {}: {}", error.employee_ref, error.error)?;
            }
        }

        if let Some(failure) = &self.failure {
            writeln!(f, "Not submitted: {}", failure)?;
        }

        if self.recoverable {
            writeln!(f, "Resubmit with overwrite mode enabled to update existing entries.")?;
        }

        Ok(())
    }
}
