//! Record normalization.
//!
//! Converts one raw record into a [`PayrollEntryDraft`](crate::models::PayrollEntryDraft)
//! using the session's [`MappingPlan`](crate::mapping::MappingPlan):
//! coerces noisy amounts, splits or composes names, builds the earning and
//! deduction detail maps, classifies personnel and derives any aggregate
//! the source did not supply.

mod amount;
mod builder;
mod name;
mod personnel;

pub use amount::{ParsedAmount, coerce_amount, max_amount, parse_amount};
pub use builder::{build_draft, build_drafts};
pub use name::{compose_full_name, split_full_name};
pub use personnel::{PERSONNEL_RULES, classify_personnel};
