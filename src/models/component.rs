//! Payroll component definitions.
//!
//! Components are the earning and deduction line items configured at
//! runtime by the payroll administrators. Their codes are not known at
//! compile time.

use serde::{Deserialize, Serialize};

use super::TargetField;

/// The accounting category of a payroll component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    /// Adds to gross pay.
    Earning,
    /// Subtracted from gross pay.
    Deduction,
    /// Informational aggregate (e.g. annual or quarterly summary). Never summed.
    Statistic,
    /// Computed by the payroll system from other lines. Never summed.
    Calculated,
}

impl ComponentCategory {
    /// Returns true for categories that must never enter a gross or net total.
    pub fn is_derived(self) -> bool {
        matches!(self, ComponentCategory::Statistic | ComponentCategory::Calculated)
    }
}

/// A single entry of the component catalog.
///
/// # Example
///
/// ```
/// use payroll_import::models::{ComponentCategory, ComponentDefinition};
///
/// let pension = ComponentDefinition::new("PENSION_PERSONAL", "养老保险", ComponentCategory::Deduction);
/// assert!(pension.active);
/// assert_eq!(
///     pension.detail_key().map(|t| t.to_string()),
///     Some("deductions_details.PENSION_PERSONAL.amount".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    /// Unique component code.
    pub code: String,
    /// Display name, usually the column header operators type.
    pub name: String,
    /// Accounting category.
    pub category: ComponentCategory,
    /// Whether the payroll system computes this line itself.
    #[serde(default)]
    pub has_calculation_logic: bool,
    /// Inactive components are dropped when the catalog is loaded.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ComponentDefinition {
    /// Creates an active component without calculation logic.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: ComponentCategory,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
            has_calculation_logic: false,
            active: true,
        }
    }

    /// Returns true if this component must be kept out of gross and net sums.
    pub fn is_derived(&self) -> bool {
        self.category.is_derived()
    }

    /// The nested detail key a source column for this component maps to,
    /// or `None` for derived components which are always ignored.
    pub fn detail_key(&self) -> Option<TargetField> {
        match self.category {
            ComponentCategory::Earning => Some(TargetField::Earning(self.code.clone())),
            ComponentCategory::Deduction => Some(TargetField::Deduction(self.code.clone())),
            ComponentCategory::Statistic | ComponentCategory::Calculated => None,
        }
    }
}
