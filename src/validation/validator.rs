//! The invariant validator.

use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::ComponentCatalog;
use crate::models::{PayrollEntryDraft, PersonnelType, ValidationResult};

use super::policy::DeductionPolicy;
use super::violation::Violation;

/// Tolerance for every monetary comparison.
pub fn money_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b)
        .is_some_and(|difference| difference.abs() <= money_tolerance())
}

/// Checks drafts against the entry invariants.
///
/// Checks run in a fixed order: required fields, the gross and net
/// balances, then the personnel-type deduction rule. Validation is pure, so
/// validating a draft twice yields the same violations.
///
/// # Example
///
/// ```
/// use payroll_import::catalog::ComponentCatalog;
/// use payroll_import::models::PayrollEntryDraft;
/// use payroll_import::validation::InvariantValidator;
///
/// let catalog = ComponentCatalog::empty();
/// let validator = InvariantValidator::new(&catalog);
/// let errors = validator.validate(&PayrollEntryDraft::empty(0));
/// assert!(errors.contains(&"Full name is required".to_string()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InvariantValidator<'a> {
    catalog: &'a ComponentCatalog,
}

impl<'a> InvariantValidator<'a> {
    /// Creates a validator for one import session.
    pub fn new(catalog: &'a ComponentCatalog) -> Self {
        Self { catalog }
    }

    /// Returns every violated invariant as data.
    pub fn check(&self, draft: &PayrollEntryDraft) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_required_fields(draft, &mut violations);
        self.check_balances(draft, &mut violations);
        self.check_deduction_total(draft, &mut violations);
        violations
    }

    /// Returns the human-readable violations; empty means valid.
    pub fn validate(&self, draft: &PayrollEntryDraft) -> Vec<String> {
        self.check(draft).iter().map(ToString::to_string).collect()
    }

    /// Validates a batch, one result per draft in input order.
    pub fn validate_all(&self, drafts: Vec<PayrollEntryDraft>) -> Vec<ValidationResult> {
        drafts
            .into_iter()
            .map(|draft| {
                let errors = self.validate(&draft);
                ValidationResult::new(draft, errors)
            })
            .collect()
    }

    /// Sum of earnings, statistic and calculated components excluded.
    pub fn earnings_sum(&self, draft: &PayrollEntryDraft) -> Decimal {
        draft
            .earnings
            .iter()
            .filter(|(code, _)| !self.catalog.is_derived(code))
            .map(|(_, item)| item.amount)
            .sum()
    }

    fn check_required_fields(&self, draft: &PayrollEntryDraft, violations: &mut Vec<Violation>) {
        if draft.full_name.trim().is_empty() {
            violations.push(Violation::MissingFullName);
        }
        if draft.id_number.trim().is_empty() {
            violations.push(Violation::MissingIdNumber);
        }
        violations.extend(
            draft
                .unparsed_fields
                .iter()
                .map(|&field| Violation::NonNumericAmount { field }),
        );
        if !draft.has_employee_match_info() {
            violations.push(Violation::MissingEmployeeMatch);
        }
    }

    fn check_balances(&self, draft: &PayrollEntryDraft, violations: &mut Vec<Violation>) {
        // A record whose earnings were all zero-suppressed is exempt.
        let earnings_sum = self.earnings_sum(draft);
        if !earnings_sum.is_zero() && !within_tolerance(draft.gross_pay, earnings_sum) {
            violations.push(Violation::GrossPayMismatch {
                gross_pay: draft.gross_pay,
                earnings_sum,
            });
        }

        let balanced = draft
            .gross_pay
            .checked_sub(draft.total_deductions)
            .is_some_and(|expected| within_tolerance(expected, draft.net_pay));
        if !balanced {
            violations.push(Violation::NetPayMismatch {
                gross_pay: draft.gross_pay,
                total_deductions: draft.total_deductions,
                net_pay: draft.net_pay,
            });
        }
    }

    fn check_deduction_total(&self, draft: &PayrollEntryDraft, violations: &mut Vec<Violation>) {
        if draft.personnel_type == PersonnelType::Unknown {
            debug!(
                row = draft.original_index,
                "Personnel type unknown, counting all deductions"
            );
        }

        let expected = DeductionPolicy::for_personnel(draft.personnel_type).expected_total(draft);
        if !within_tolerance(draft.total_deductions, expected) {
            violations.push(Violation::DeductionTotalMismatch {
                personnel_type: draft.personnel_type,
                expected,
                total_deductions: draft.total_deductions,
            });
        }
    }
}
