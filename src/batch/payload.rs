//! Wire types exchanged with the backing store.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CreatedEntry, LineItem, PayrollEntryDraft, PersonnelType};

/// One entry of a bulk request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPayload {
    /// The draft's client id, echoed back by the store.
    pub client_id: Uuid,
    /// Internal employee reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    /// Full name.
    pub full_name: String,
    /// Surname, for employee matching.
    pub last_name: String,
    /// Given name, for employee matching.
    pub first_name: String,
    /// National ID number, for employee matching.
    pub id_number: String,
    /// Employment category.
    pub personnel_type: PersonnelType,
    /// Total earnings.
    pub gross_pay: Decimal,
    /// Total deductions.
    pub total_deductions: Decimal,
    /// Net pay.
    pub net_pay: Decimal,
    /// Earning lines by component code.
    pub earnings_details: BTreeMap<String, LineItem>,
    /// Deduction lines by component code.
    pub deductions_details: BTreeMap<String, LineItem>,
    /// Free-text remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Entry status reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_id: Option<String>,
}

impl EntryPayload {
    /// The key the store matches employees by: the employee code when
    /// present, otherwise the ID number.
    pub fn employee_key(&self) -> &str {
        match self.employee_code.as_deref() {
            Some(code) if !code.trim().is_empty() => code,
            _ => &self.id_number,
        }
    }
}

impl From<&PayrollEntryDraft> for EntryPayload {
    fn from(draft: &PayrollEntryDraft) -> Self {
        Self {
            client_id: draft.client_id,
            employee_code: draft.employee_code.clone(),
            full_name: draft.full_name.clone(),
            last_name: draft.last_name.clone(),
            first_name: draft.first_name.clone(),
            id_number: draft.id_number.clone(),
            personnel_type: draft.personnel_type,
            gross_pay: draft.gross_pay,
            total_deductions: draft.total_deductions,
            net_pay: draft.net_pay,
            earnings_details: draft.earnings.clone(),
            deductions_details: draft.deductions.clone(),
            remarks: draft.remarks.clone(),
            status_id: draft.status_id.clone(),
        }
    }
}

/// One atomic bulk upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkSubmissionRequest {
    /// Target pay period.
    pub period_id: String,
    /// True to update existing (employee, period) entries in place; false to
    /// reject them as duplicates.
    pub overwrite_mode: bool,
    /// The valid entries.
    pub entries: Vec<EntryPayload>,
}

/// A per-record rejection as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecordError {
    /// Employee reference.
    pub employee_ref: String,
    /// The store's message.
    pub error: String,
    /// Machine-readable error code, when the store provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// The store's answer to a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkSubmissionResponse {
    /// Entries persisted.
    pub success_count: usize,
    /// Entries rejected.
    pub error_count: usize,
    /// Per-record rejections.
    #[serde(default)]
    pub errors: Vec<StoreRecordError>,
    /// Persisted entries.
    #[serde(default)]
    pub created_entries: Vec<CreatedEntry>,
}
