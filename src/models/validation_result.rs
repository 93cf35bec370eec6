//! Validation outcomes per record and per batch.

use serde::{Deserialize, Serialize};

use super::PayrollEntryDraft;

/// The validation outcome of one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The validated draft.
    pub draft: PayrollEntryDraft,
    /// Human-readable violations. Empty when valid.
    pub errors: Vec<String>,
    /// True when `errors` is empty.
    pub is_valid: bool,
}

impl ValidationResult {
    /// Pairs a draft with its violations.
    pub fn new(draft: PayrollEntryDraft, errors: Vec<String>) -> Self {
        let is_valid = errors.is_empty();
        Self {
            draft,
            errors,
            is_valid,
        }
    }
}

/// One record excluded from submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidRecord {
    /// Zero-based position of the source row.
    pub original_index: usize,
    /// The record's name, as far as it could be read.
    pub full_name: String,
    /// The violated invariants.
    pub errors: Vec<String>,
}

/// Counts and details for a validated batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Records checked.
    pub total: usize,
    /// Records with no violations.
    pub valid: usize,
    /// Records with at least one violation.
    pub invalid: usize,
    /// The invalid records in source order.
    #[serde(default)]
    pub invalid_records: Vec<InvalidRecord>,
    /// Source columns whose mapping needs manual review.
    #[serde(default)]
    pub ambiguous_fields: Vec<String>,
}

impl ValidationSummary {
    /// Summarizes a set of results.
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let invalid_records: Vec<InvalidRecord> = results
            .iter()
            .filter(|result| !result.is_valid)
            .map(|result| InvalidRecord {
                original_index: result.draft.original_index,
                full_name: result.draft.full_name.clone(),
                errors: result.errors.clone(),
            })
            .collect();

        Self {
            total: results.len(),
            valid: results.len() - invalid_records.len(),
            invalid: invalid_records.len(),
            invalid_records,
            ambiguous_fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result_is_valid_follows_errors() {
        let ok = ValidationResult::new(PayrollEntryDraft::empty(0), vec![]);
        assert!(ok.is_valid);

        let bad = ValidationResult::new(
            PayrollEntryDraft::empty(1),
            vec!["Full name is required".to_string()],
        );
        assert!(!bad.is_valid);
    }

    #[test]
    fn test_summary_counts() {
        let mut named = PayrollEntryDraft::empty(2);
        named.full_name = "李四".to_string();
        let results = vec![
            ValidationResult::new(PayrollEntryDraft::empty(0), vec![]),
            ValidationResult::new(PayrollEntryDraft::empty(1), vec![]),
            ValidationResult::new(named, vec!["ID number is required".to_string()]),
        ];

        let summary = ValidationSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.invalid_records[0].original_index, 2);
        assert_eq!(summary.invalid_records[0].full_name, "李四");
    }
}
