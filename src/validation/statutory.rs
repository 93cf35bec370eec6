//! The standard statutory deduction set.
//!
//! Regular staff are only ever deducted these items. A deduction line is
//! statutory when its code is one of [`STANDARD_STATUTORY_CODES`], or when
//! its code or display name carries one of the fallback keywords (catalogs
//! configured before the canonical codes existed use other codes).

use crate::models::LineItem;

/// Canonical codes of the personal pension, medical, occupational pension,
/// unemployment, housing fund and income tax deductions.
pub const STANDARD_STATUTORY_CODES: &[&str] = &[
    "PENSION_PERSONAL",
    "MEDICAL_PERSONAL",
    "OCCUPATIONAL_PENSION_PERSONAL",
    "UNEMPLOYMENT_PERSONAL",
    "HOUSING_FUND_PERSONAL",
    "PERSONAL_INCOME_TAX",
];

/// Code fragments (compared upper-case) that mark a statutory deduction.
pub const STATUTORY_CODE_KEYWORDS: &[&str] = &[
    "PENSION",
    "MEDICAL",
    "UNEMPLOYMENT",
    "HOUSING_FUND",
    "INCOME_TAX",
    "SOCIAL",
];

/// Display-name fragments that mark a statutory deduction.
pub const STATUTORY_NAME_KEYWORDS: &[&str] = &[
    "养老", "医疗", "医保", "职业年金", "失业", "公积金", "所得税", "个税", "社保",
];

/// Returns true if the deduction line counts toward the statutory sum.
///
/// # Example
///
/// ```
/// use payroll_import::models::LineItem;
/// use payroll_import::validation::is_statutory_deduction;
/// use rust_decimal::Decimal;
///
/// assert!(is_statutory_deduction("PENSION_PERSONAL", &LineItem::new(Decimal::ZERO, "养老保险")));
/// assert!(!is_statutory_deduction("ONE_TIME_ADJUSTMENT", &LineItem::new(Decimal::ZERO, "一次性补扣")));
/// ```
pub fn is_statutory_deduction(code: &str, item: &LineItem) -> bool {
    if STANDARD_STATUTORY_CODES.contains(&code) {
        return true;
    }
    let upper = code.to_uppercase();
    STATUTORY_CODE_KEYWORDS.iter().any(|k| upper.contains(k))
        || STATUTORY_NAME_KEYWORDS.iter().any(|k| item.name.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn line(name: &str) -> LineItem {
        LineItem::new(Decimal::ZERO, name)
    }

    #[test]
    fn test_canonical_codes_are_statutory() {
        for code in STANDARD_STATUTORY_CODES {
            assert!(is_statutory_deduction(code, &line("")), "{}", code);
        }
    }

    #[test]
    fn test_code_keyword_fallback() {
        assert!(is_statutory_deduction("SOCIAL", &line("")));
        assert!(is_statutory_deduction("pension_company_2024", &line("")));
    }

    #[test]
    fn test_name_keyword_fallback() {
        assert!(is_statutory_deduction("D017", &line("补缴住房公积金")));
        assert!(is_statutory_deduction("D018", &line("个税")));
    }

    #[test]
    fn test_ad_hoc_deductions_are_not_statutory() {
        assert!(!is_statutory_deduction("ONE_TIME_ADJUSTMENT", &line("一次性补扣")));
        assert!(!is_statutory_deduction("UNION_FEE", &line("工会会费")));
    }
}
