//! The persistence boundary.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::CreatedEntry;

use super::payload::{BulkSubmissionRequest, BulkSubmissionResponse, StoreRecordError};

/// Whole-request failures reported by a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The store refused the entire batch on a unique (employee, period)
    /// conflict.
    #[error("duplicate entry: {message}")]
    Duplicate {
        /// The store's description of the conflict.
        message: String,
    },
    /// Transport or server failure.
    #[error("{message}")]
    Failed {
        /// A description of the failure.
        message: String,
    },
}

/// The external store that persists validated entries.
///
/// One call per submission; implementations decide commit ordering and
/// report partial success per record.
#[async_trait]
pub trait EntrySink: Send + Sync + 'static {
    /// Submits one bulk upsert.
    async fn submit_bulk_entries(
        &self,
        request: BulkSubmissionRequest,
    ) -> Result<BulkSubmissionResponse, SinkError>;
}

#[async_trait]
impl<T: EntrySink + ?Sized> EntrySink for Arc<T> {
    async fn submit_bulk_entries(
        &self,
        request: BulkSubmissionRequest,
    ) -> Result<BulkSubmissionResponse, SinkError> {
        (**self).submit_bulk_entries(request).await
    }
}

/// The code the in-memory store attaches to duplicate rejections.
pub const DUPLICATE_ENTRY_CODE: &str = "DUPLICATE_ENTRY";

#[derive(Debug, Default)]
struct StoreState {
    /// `(period_id, employee_key)` → entry id.
    entries: HashMap<(String, String), String>,
    requests: Vec<BulkSubmissionRequest>,
}

/// A store kept in process memory, unique per (employee, period).
///
/// Used by the HTTP surface when no external store is wired in, and by
/// tests to observe exactly what was submitted.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    state: Arc<Mutex<StoreState>>,
}

impl InMemorySink {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> Vec<BulkSubmissionRequest> {
        self.lock().requests.clone()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EntrySink for InMemorySink {
    async fn submit_bulk_entries(
        &self,
        request: BulkSubmissionRequest,
    ) -> Result<BulkSubmissionResponse, SinkError> {
        let mut state = self.lock();
        let mut response = BulkSubmissionResponse::default();

        for entry in &request.entries {
            let key = (request.period_id.clone(), entry.employee_key().to_string());
            let existing = state.entries.get(&key).cloned();
            let entry_id = match existing {
                Some(existing) if request.overwrite_mode => existing,
                Some(_) => {
                    response.errors.push(StoreRecordError {
                        employee_ref: entry.employee_key().to_string(),
                        error: format!(
                            "an entry already exists for employee {} in period {}",
                            entry.employee_key(),
                            request.period_id
                        ),
                        code: Some(DUPLICATE_ENTRY_CODE.to_string()),
                    });
                    continue;
                }
                None => {
                    let id = Uuid::new_v4().to_string();
                    state.entries.insert(key, id.clone());
                    id
                }
            };
            response.created_entries.push(CreatedEntry {
                entry_id,
                employee_ref: entry.employee_key().to_string(),
                client_id: Some(entry.client_id),
            });
        }

        response.success_count = response.created_entries.len();
        response.error_count = response.errors.len();
        state.requests.push(request);
        Ok(response)
    }
}
