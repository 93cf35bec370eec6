//! Bulk submission results as seen by callers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a per-record store failure should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordErrorKind {
    /// An entry already exists for the employee and period. Resubmitting
    /// with overwrite mode updates it in place.
    Duplicate,
    /// Any other rejection.
    Other,
}

/// A record the backing store did not persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    /// Employee reference as reported by the store.
    pub employee_ref: String,
    /// Operator-facing message.
    pub error: String,
    /// Failure class.
    pub kind: RecordErrorKind,
}

impl RecordError {
    /// Returns true if resubmitting with overwrite mode would resolve it.
    pub fn is_recoverable(&self) -> bool {
        self.kind == RecordErrorKind::Duplicate
    }
}

/// An entry the store created or updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEntry {
    /// Store-side entry id.
    pub entry_id: String,
    /// Employee reference.
    pub employee_ref: String,
    /// The draft's client id, when the store echoes it back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
}

/// The reconciled outcome of one bulk submission call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkSubmissionResult {
    /// Entries persisted.
    pub success_count: usize,
    /// Entries rejected.
    pub error_count: usize,
    /// Per-record rejections.
    pub errors: Vec<RecordError>,
    /// Persisted entries.
    pub created_entries: Vec<CreatedEntry>,
}

impl BulkSubmissionResult {
    /// Returns true if every rejection is a duplicate that overwrite mode fixes.
    pub fn all_errors_recoverable(&self) -> bool {
        !self.errors.is_empty() && self.errors.iter().all(RecordError::is_recoverable)
    }
}
