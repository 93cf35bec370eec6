//! Invariant violations.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BaseField, PersonnelType};

/// One violated invariant on a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// No full name.
    MissingFullName,
    /// No ID number.
    MissingIdNumber,
    /// An aggregate column held text that is not a number.
    NonNumericAmount {
        /// The aggregate field.
        field: BaseField,
    },
    /// Neither an employee reference nor the last name, first name and ID
    /// number triple is present.
    MissingEmployeeMatch,
    /// Gross pay differs from the summed earnings.
    GrossPayMismatch {
        /// Gross pay on the draft.
        gross_pay: Decimal,
        /// Sum of earnings, derived components excluded.
        earnings_sum: Decimal,
    },
    /// Gross pay minus total deductions differs from net pay.
    NetPayMismatch {
        /// Gross pay on the draft.
        gross_pay: Decimal,
        /// Total deductions on the draft.
        total_deductions: Decimal,
        /// Net pay on the draft.
        net_pay: Decimal,
    },
    /// Total deductions differ from what the personnel type's rule counts.
    DeductionTotalMismatch {
        /// The personnel type whose rule applied.
        personnel_type: PersonnelType,
        /// The sum the rule expects.
        expected: Decimal,
        /// Total deductions on the draft.
        total_deductions: Decimal,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingFullName => f.write_str("Full name is required"),
            Violation::MissingIdNumber => f.write_str("ID number is required"),
            Violation::NonNumericAmount { field } => {
                write!(f, "{} must be a number", field.key())
            }
            Violation::MissingEmployeeMatch => f.write_str(
                "Employee cannot be matched: provide an employee code, \
                 or last name, first name and ID number",
            ),
            Violation::GrossPayMismatch {
                gross_pay,
                earnings_sum,
            } => write!(
                f,
                "Gross pay {} does not match the sum of earnings {}",
                gross_pay, earnings_sum
            ),
            Violation::NetPayMismatch {
                gross_pay,
                total_deductions,
                net_pay,
            } => match gross_pay.checked_sub(*total_deductions) {
                Some(expected) => write!(
                    f,
                    "Net pay {} does not match gross pay {} minus total deductions {} (expected {})",
                    net_pay, gross_pay, total_deductions, expected
                ),
                None => write!(
                    f,
                    "Net pay {} does not match gross pay {} minus total deductions {} (out of range)",
                    net_pay, gross_pay, total_deductions
                ),
            },
            Violation::DeductionTotalMismatch {
                personnel_type,
                expected,
                total_deductions,
            } => {
                let counted = match personnel_type {
                    PersonnelType::Regular => "statutory deductions",
                    PersonnelType::Hired | PersonnelType::Unknown => "all deductions",
                };
                write!(
                    f,
                    "Total deductions {} do not match the sum of {} {} for {:?} personnel",
                    total_deductions, counted, expected, personnel_type
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_pay_message_includes_expected_value() {
        let violation = Violation::NetPayMismatch {
            gross_pay: Decimal::from(5000),
            total_deductions: Decimal::from(300),
            net_pay: Decimal::from(4650),
        };
        let message = violation.to_string();
        assert!(message.starts_with("Net pay 4650"));
        assert!(message.contains("expected 4700"));
    }

    #[test]
    fn test_regular_deduction_message_names_statutory_rule() {
        let violation = Violation::DeductionTotalMismatch {
            personnel_type: PersonnelType::Regular,
            expected: Decimal::from(200),
            total_deductions: Decimal::from(250),
        };
        assert_eq!(
            violation.to_string(),
            "Total deductions 250 do not match the sum of statutory deductions 200 for Regular personnel"
        );
    }

    #[test]
    fn test_non_numeric_amount_uses_field_key() {
        let violation = Violation::NonNumericAmount {
            field: BaseField::GrossPay,
        };
        assert_eq!(violation.to_string(), "gross_pay must be a number");
    }

    #[test]
    fn test_violation_serializes_with_kind_tag() {
        let json = serde_json::to_value(Violation::MissingIdNumber).unwrap();
        assert_eq!(json["kind"], "missing_id_number");
    }
}
