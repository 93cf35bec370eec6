//! Personnel-type classification from free-text identity tags.
//!
//! Rules are evaluated top to bottom; the first rule with a token contained
//! in the (lowercased) identity text decides the type.

use crate::models::PersonnelType;

/// Ordered token rules. Negated establishment terms come first because
/// "非在编" contains "在编".
pub const PERSONNEL_RULES: &[(PersonnelType, &[&str])] = &[
    (PersonnelType::Hired, &["非在编", "编外", "非编"]),
    (
        PersonnelType::Regular,
        &[
            "在编", "编制内", "正式", "行政编", "事业编", "公务员", "参公", "regular",
            "established", "civil",
        ],
    ),
    (
        PersonnelType::Hired,
        &[
            "聘用", "合同", "派遣", "临时", "外聘", "劳务", "hired", "contract", "dispatch",
            "temporary",
        ],
    ),
];

/// Classifies an identity tag. Unrecognized or empty text is `Unknown`.
///
/// # Example
///
/// ```
/// use payroll_import::models::PersonnelType;
/// use payroll_import::normalize::classify_personnel;
///
/// assert_eq!(classify_personnel("在编"), PersonnelType::Regular);
/// assert_eq!(classify_personnel("劳务派遣"), PersonnelType::Hired);
/// assert_eq!(classify_personnel(""), PersonnelType::Unknown);
/// ```
pub fn classify_personnel(identity: &str) -> PersonnelType {
    let text = identity.trim().to_lowercase();
    if text.is_empty() {
        return PersonnelType::Unknown;
    }

    PERSONNEL_RULES
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|token| text.contains(token)))
        .map(|(personnel_type, _)| *personnel_type)
        .unwrap_or(PersonnelType::Unknown)
}
