//! Field mapping rules produced by the field semantics resolver.
//!
//! A rule ties one raw source column to a canonical target: a base field of
//! the payroll entry, a component detail amount, or nothing at all.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The target string used for columns that are deliberately not imported.
pub const IGNORE_TARGET: &str = "__IGNORE__";

const EARNINGS_PREFIX: &str = "earnings_details.";
const DEDUCTIONS_PREFIX: &str = "deductions_details.";
const AMOUNT_SUFFIX: &str = ".amount";

/// The fixed, non-component fields of a payroll entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseField {
    /// Internal employee reference (工号).
    EmployeeCode,
    /// Combined full name.
    FullName,
    /// Surname.
    LastName,
    /// Given name.
    FirstName,
    /// National ID number.
    IdNumber,
    /// Free-text personnel identity used for category classification.
    PersonnelIdentity,
    /// Total earnings before deductions.
    GrossPay,
    /// Total deductions.
    TotalDeductions,
    /// Gross pay minus total deductions.
    NetPay,
    /// Free-text remarks.
    Remarks,
    /// Entry status reference.
    StatusId,
}

impl BaseField {
    /// All base fields in resolution order.
    pub const ALL: [BaseField; 11] = [
        BaseField::EmployeeCode,
        BaseField::FullName,
        BaseField::LastName,
        BaseField::FirstName,
        BaseField::IdNumber,
        BaseField::PersonnelIdentity,
        BaseField::GrossPay,
        BaseField::TotalDeductions,
        BaseField::NetPay,
        BaseField::Remarks,
        BaseField::StatusId,
    ];

    /// The canonical key of this field.
    pub fn key(self) -> &'static str {
        match self {
            BaseField::EmployeeCode => "employee_code",
            BaseField::FullName => "full_name",
            BaseField::LastName => "last_name",
            BaseField::FirstName => "first_name",
            BaseField::IdNumber => "id_number",
            BaseField::PersonnelIdentity => "personnel_identity",
            BaseField::GrossPay => "gross_pay",
            BaseField::TotalDeductions => "total_deductions",
            BaseField::NetPay => "net_pay",
            BaseField::Remarks => "remarks",
            BaseField::StatusId => "status_id",
        }
    }

    /// Looks a base field up by its canonical key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Returns true for the monetary aggregate fields.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            BaseField::GrossPay | BaseField::TotalDeductions | BaseField::NetPay
        )
    }

    /// The rule category a column mapped to this field is reported under.
    pub fn rule_category(self) -> RuleCategory {
        if self.is_aggregate() {
            RuleCategory::Calculated
        } else {
            RuleCategory::Base
        }
    }
}

/// Where a source column's value ends up in the draft.
///
/// Serialized as a plain string: the base field key,
/// `earnings_details.<code>.amount`, `deductions_details.<code>.amount`
/// or `__IGNORE__`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TargetField {
    /// A fixed entry field.
    Base(BaseField),
    /// An earning component amount, keyed by code.
    Earning(String),
    /// A deduction component amount, keyed by code.
    Deduction(String),
    /// Not imported.
    Ignore,
}

impl TargetField {
    /// Returns true if the column is not imported.
    pub fn is_ignore(&self) -> bool {
        matches!(self, TargetField::Ignore)
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetField::Base(field) => f.write_str(field.key()),
            TargetField::Earning(code) => write!(f, "{EARNINGS_PREFIX}{code}{AMOUNT_SUFFIX}"),
            TargetField::Deduction(code) => write!(f, "{DEDUCTIONS_PREFIX}{code}{AMOUNT_SUFFIX}"),
            TargetField::Ignore => f.write_str(IGNORE_TARGET),
        }
    }
}

impl FromStr for TargetField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == IGNORE_TARGET {
            return Ok(TargetField::Ignore);
        }
        if let Some(field) = BaseField::from_key(s) {
            return Ok(TargetField::Base(field));
        }
        let detail = |prefix: &str| {
            s.strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(AMOUNT_SUFFIX))
                .filter(|code| !code.is_empty())
                .map(str::to_string)
        };
        if let Some(code) = detail(EARNINGS_PREFIX) {
            return Ok(TargetField::Earning(code));
        }
        if let Some(code) = detail(DEDUCTIONS_PREFIX) {
            return Ok(TargetField::Deduction(code));
        }
        Err(format!("unknown target field '{}'", s))
    }
}

impl From<TargetField> for String {
    fn from(target: TargetField) -> Self {
        target.to_string()
    }
}

impl TryFrom<String> for TargetField {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The category a mapping rule is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Identity and bookkeeping fields.
    Base,
    /// Earning component amounts.
    Earning,
    /// Deduction component amounts.
    Deduction,
    /// Aggregates and derived figures.
    Calculated,
    /// Not imported.
    Ignore,
}

/// The resolved mapping for one distinct source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMappingRule {
    /// The raw column name as received.
    pub source_field: String,
    /// Where the column's values go.
    pub target_field: TargetField,
    /// Resolution confidence in `0.0..=1.0`.
    pub confidence: f64,
    /// Reporting category.
    pub category: RuleCategory,
    /// Human-readable rationale.
    pub reason: String,
}

impl FieldMappingRule {
    /// Returns true if the rule should be surfaced for manual review.
    pub fn is_ambiguous(&self, threshold: f64) -> bool {
        self.confidence < threshold
    }
}
