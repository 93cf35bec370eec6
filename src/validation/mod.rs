//! Invariant validation.
//!
//! Runs category-agnostic checks (required fields, gross and net balances)
//! and the category-specific deduction rule on each draft. Violations never
//! abort a batch; they exclude the record from submission and are reported
//! back to the operator.

mod policy;
mod statutory;
mod validator;
mod violation;

pub use policy::{DEDUCTION_POLICIES, DeductionPolicy};
pub use statutory::{
    STANDARD_STATUTORY_CODES, STATUTORY_CODE_KEYWORDS, STATUTORY_NAME_KEYWORDS,
    is_statutory_deduction,
};
pub use validator::{InvariantValidator, money_tolerance};
pub use violation::Violation;

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::ComponentCatalog;
    use crate::models::{LineItem, PayrollEntryDraft, PersonnelType};

    const CODES: [(&str, &str); 4] = [
        ("PENSION_PERSONAL", "养老保险"),
        ("PERSONAL_INCOME_TAX", "个人所得税"),
        ("ONE_TIME_ADJUSTMENT", "一次性补扣"),
        ("UNION_FEE", "工会会费"),
    ];

    fn personnel() -> impl Strategy<Value = PersonnelType> {
        prop_oneof![
            Just(PersonnelType::Regular),
            Just(PersonnelType::Hired),
            Just(PersonnelType::Unknown),
        ]
    }

    /// A draft whose totals follow its personnel type's deduction rule.
    fn consistent_draft() -> impl Strategy<Value = PayrollEntryDraft> {
        (personnel(), 0i64..1_000_000, prop::collection::vec(0i64..100_000, 4)).prop_map(
            |(personnel_type, gross_cents, amounts)| {
                let mut draft = PayrollEntryDraft::empty(0);
                draft.full_name = "张三".to_string();
                draft.last_name = "张".to_string();
                draft.first_name = "三".to_string();
                draft.id_number = "11010119900101001X".to_string();
                draft.personnel_type = personnel_type;
                for ((code, name), cents) in CODES.iter().zip(amounts) {
                    draft
                        .deductions
                        .insert(code.to_string(), LineItem::new(Decimal::new(cents, 2), *name));
                }
                draft.gross_pay = Decimal::new(gross_cents, 2);
                draft.total_deductions =
                    DeductionPolicy::for_personnel(personnel_type).expected_total(&draft);
                draft.net_pay = draft.gross_pay - draft.total_deductions;
                draft
            },
        )
    }

    proptest! {
        #[test]
        fn valid_drafts_stay_valid(draft in consistent_draft()) {
            let catalog = ComponentCatalog::empty();
            let validator = InvariantValidator::new(&catalog);
            prop_assert!(validator.validate(&draft).is_empty());
            prop_assert!(validator.validate(&draft).is_empty());
        }

        #[test]
        fn regular_totals_count_statutory_lines_only(draft in consistent_draft()) {
            let statutory: Decimal = draft
                .deductions
                .iter()
                .filter(|(code, _)| STANDARD_STATUTORY_CODES.contains(&code.as_str()))
                .map(|(_, item)| item.amount)
                .sum();
            match draft.personnel_type {
                PersonnelType::Regular => prop_assert_eq!(draft.total_deductions, statutory),
                PersonnelType::Hired | PersonnelType::Unknown => {
                    prop_assert_eq!(draft.total_deductions, draft.deductions_sum())
                }
            }
        }
    }
}
