//! Deduction accounting rules per personnel type.
//!
//! Each personnel type is bound to one [`DeductionPolicy`] through
//! [`DEDUCTION_POLICIES`], so the rule applied to a draft is a table lookup
//! rather than inline branching.

use rust_decimal::Decimal;

use crate::models::{PayrollEntryDraft, PersonnelType};

use super::statutory::is_statutory_deduction;

/// Which deduction lines count toward `total_deductions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductionPolicy {
    /// Only the standard statutory items.
    StatutoryOnly,
    /// Every deduction line on the record.
    AllDeductions,
}

/// The policy table.
///
/// `Unknown` uses the hired-staff rule. No explicit policy for unclassified
/// personnel exists; counting every line is the least surprising choice.
pub const DEDUCTION_POLICIES: [(PersonnelType, DeductionPolicy); 3] = [
    (PersonnelType::Regular, DeductionPolicy::StatutoryOnly),
    (PersonnelType::Hired, DeductionPolicy::AllDeductions),
    (PersonnelType::Unknown, DeductionPolicy::AllDeductions),
];

impl DeductionPolicy {
    /// Looks up the policy for a personnel type.
    pub fn for_personnel(personnel_type: PersonnelType) -> Self {
        DEDUCTION_POLICIES
            .iter()
            .find(|(tag, _)| *tag == personnel_type)
            .map(|(_, policy)| *policy)
            .unwrap_or(DeductionPolicy::AllDeductions)
    }

    /// The total deductions this policy expects for a draft.
    pub fn expected_total(self, draft: &PayrollEntryDraft) -> Decimal {
        match self {
            DeductionPolicy::StatutoryOnly => draft
                .deductions
                .iter()
                .filter(|(code, item)| is_statutory_deduction(code, item))
                .map(|(_, item)| item.amount)
                .sum(),
            DeductionPolicy::AllDeductions => draft.deductions_sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;

    fn draft_with_deductions(lines: &[(&str, i64)]) -> PayrollEntryDraft {
        let mut draft = PayrollEntryDraft::empty(0);
        for (code, amount) in lines {
            draft
                .deductions
                .insert(code.to_string(), LineItem::new(Decimal::from(*amount), *code));
        }
        draft
    }

    #[test]
    fn test_policy_table() {
        assert_eq!(
            DeductionPolicy::for_personnel(PersonnelType::Regular),
            DeductionPolicy::StatutoryOnly
        );
        assert_eq!(
            DeductionPolicy::for_personnel(PersonnelType::Hired),
            DeductionPolicy::AllDeductions
        );
        assert_eq!(
            DeductionPolicy::for_personnel(PersonnelType::Unknown),
            DeductionPolicy::AllDeductions
        );
    }

    #[test]
    fn test_statutory_only_ignores_ad_hoc_lines() {
        let draft = draft_with_deductions(&[("SOCIAL", 200), ("ONE_TIME_ADJUSTMENT", 50)]);
        assert_eq!(
            DeductionPolicy::StatutoryOnly.expected_total(&draft),
            Decimal::from(200)
        );
    }

    #[test]
    fn test_all_deductions_counts_everything() {
        let draft = draft_with_deductions(&[("SOCIAL", 200), ("ONE_TIME_ADJUSTMENT", 50)]);
        assert_eq!(
            DeductionPolicy::AllDeductions.expected_total(&draft),
            Decimal::from(250)
        );
    }
}
