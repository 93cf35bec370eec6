//! Error types for the payroll import engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the conditions that abort a session or a submission. Per-record
//! problems (invariant violations, low-confidence mappings) are carried as
//! data on the results instead, because they never abort a batch.

use thiserror::Error;

/// The main error type for the payroll import engine.
///
/// # Example
///
/// ```
/// use payroll_import::error::ImportError;
///
/// let error = ImportError::ConfigNotFound {
///     path: "/missing/import.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/import.yaml");
/// ```
#[derive(Debug, Error)]
pub enum ImportError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The component catalog service could not be reached.
    #[error("Component catalog unavailable: {message}")]
    CatalogUnavailable {
        /// A description of the underlying failure.
        message: String,
    },

    /// The raw payload (pasted table or JSON) could not be read at all.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// A description of what was wrong with the payload.
        message: String,
    },

    /// None of the records passed validation, so there is nothing to submit.
    #[error("No valid records to submit ({total} records checked)")]
    NoValidRecords {
        /// The number of records that were validated.
        total: usize,
    },

    /// No target pay period was selected for the submission.
    #[error("No target pay period selected")]
    NoPeriodSelected,

    /// The selected period is closed to imports under the active configuration.
    #[error("Pay period '{period_id}' is not open for import")]
    PeriodNotImportable {
        /// The rejected period.
        period_id: String,
    },

    /// The backing store rejected the batch because a record already exists
    /// for the same employee and period.
    #[error("Duplicate record: {message}; enable overwrite mode to update existing entries")]
    DuplicateRecord {
        /// The store's description of the conflict.
        message: String,
    },

    /// Generic transport or server failure; the whole batch is treated as failed.
    #[error("Submission failed: {message}")]
    SubmissionFailed {
        /// A description of the failure.
        message: String,
    },
}

impl ImportError {
    /// Returns true when the operator can fix the failure by resubmitting
    /// with overwrite mode enabled.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ImportError::DuplicateRecord { .. })
    }
}

/// A type alias for Results that return ImportError.
pub type ImportResult<T> = Result<T, ImportError>;
