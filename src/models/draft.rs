//! The canonical payroll entry draft.
//!
//! A draft is what one raw row becomes after normalization. It is owned by
//! the normalizer and validator until it is handed to the batch
//! orchestrator.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BaseField;

/// Employment category that selects the deduction accounting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonnelType {
    /// Established / civil-service staff. Only statutory deductions count.
    Regular,
    /// Hired, contracted, dispatched or temporary staff. All deductions count.
    Hired,
    /// Identity text missing or unrecognized.
    #[default]
    Unknown,
}

/// One earning or deduction amount on a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The amount.
    pub amount: Decimal,
    /// Display name of the component.
    pub name: String,
}

impl LineItem {
    /// Creates a line item.
    pub fn new(amount: Decimal, name: impl Into<String>) -> Self {
        Self {
            amount,
            name: name.into(),
        }
    }
}

/// A canonical payroll entry ready for validation.
///
/// Detail maps are keyed by component code and ordered, so two drafts built
/// from the same row always serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollEntryDraft {
    /// Client-side identifier used to correlate store responses.
    pub client_id: Uuid,
    /// Zero-based position of the source row.
    pub original_index: usize,
    /// Internal employee reference, when the source carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    /// Full name.
    pub full_name: String,
    /// Surname.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// National ID number.
    pub id_number: String,
    /// Employment category.
    pub personnel_type: PersonnelType,
    /// Total earnings before deductions.
    pub gross_pay: Decimal,
    /// Total deductions.
    pub total_deductions: Decimal,
    /// Gross pay minus total deductions.
    pub net_pay: Decimal,
    /// Earning lines by component code. Zero amounts are never present.
    pub earnings: BTreeMap<String, LineItem>,
    /// Deduction lines by component code. Zero amounts are kept.
    pub deductions: BTreeMap<String, LineItem>,
    /// Free-text remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Entry status reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_id: Option<String>,
    /// Aggregate fields whose source text was not a number (coerced to zero).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unparsed_fields: Vec<BaseField>,
}

impl PayrollEntryDraft {
    /// Creates an empty draft for the given source row.
    pub fn empty(original_index: usize) -> Self {
        Self {
            client_id: Uuid::new_v4(),
            original_index,
            employee_code: None,
            full_name: String::new(),
            last_name: String::new(),
            first_name: String::new(),
            id_number: String::new(),
            personnel_type: PersonnelType::Unknown,
            gross_pay: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            earnings: BTreeMap::new(),
            deductions: BTreeMap::new(),
            remarks: None,
            status_id: None,
            unparsed_fields: Vec::new(),
        }
    }

    /// Returns true if the store can match this draft to an employee:
    /// either an internal reference or the last name, first name and ID
    /// number triple.
    pub fn has_employee_match_info(&self) -> bool {
        let has_code = self
            .employee_code
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty());
        let has_triple = !self.last_name.trim().is_empty()
            && !self.first_name.trim().is_empty()
            && !self.id_number.trim().is_empty();
        has_code || has_triple
    }

    /// A short reference for logs and reports.
    pub fn employee_ref(&self) -> String {
        match self.employee_code.as_deref() {
            Some(code) if !code.trim().is_empty() => code.to_string(),
            _ if !self.id_number.is_empty() => format!("{} ({})", self.full_name, self.id_number),
            _ => format!("row {}", self.original_index + 1),
        }
    }

    /// Sum of every deduction line.
    pub fn deductions_sum(&self) -> Decimal {
        self.deductions.values().map(|item| item.amount).sum()
    }
}
