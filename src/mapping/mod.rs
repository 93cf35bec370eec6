//! Field semantics resolution.
//!
//! Maps arbitrary, inconsistent source column names to the canonical
//! payroll entry schema. Resolution runs an ordered list of pure matcher
//! rules (see [`rules::MATCHERS`]) against each distinct column:
//!
//! 1. exact base-field label, explicit detail key or component code (0.95)
//! 2. base-field keyword (0.8)
//! 3. summary-word heuristic (0.7 / 0.6)
//! 4. statutory-insurance heuristic (0.8)
//! 5. component display name (0.9)
//! 6. fallback `__IGNORE__` (0.1)
//!
//! The highest confidence wins; ties go to the earlier rule.

pub mod base_fields;
mod resolver;
pub mod rules;

pub use base_fields::normalize_field_name;
pub use resolver::{
    MANUAL_CONFIDENCE, MappingOverrides, MappingPlan, map_fields, map_fields_with_overrides,
    resolve_field,
};
