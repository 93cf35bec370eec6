//! Batch orchestration.
//!
//! Filters validated drafts, builds one atomic bulk request honouring the
//! overwrite mode, dispatches it to an [`EntrySink`] and reconciles the
//! per-record outcome.

mod orchestrator;
mod payload;
mod sink;

pub use orchestrator::{
    BatchOrchestrator, DUPLICATE_CODES, DUPLICATE_MARKERS, classify_record_error,
};
pub use payload::{BulkSubmissionRequest, BulkSubmissionResponse, EntryPayload, StoreRecordError};
pub use sink::{DUPLICATE_ENTRY_CODE, EntrySink, InMemorySink, SinkError};
