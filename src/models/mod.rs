//! Core data models for the payroll import engine.
//!
//! This module contains all the domain models shared by the catalog loader,
//! field resolver, normalizer, validator and batch orchestrator.

mod component;
mod draft;
mod mapping_rule;
mod submission;
mod validation_result;

pub use component::{ComponentCategory, ComponentDefinition};
pub use draft::{LineItem, PayrollEntryDraft, PersonnelType};
pub use mapping_rule::{BaseField, FieldMappingRule, IGNORE_TARGET, RuleCategory, TargetField};
pub use submission::{BulkSubmissionResult, CreatedEntry, RecordError, RecordErrorKind};
pub use validation_result::{InvalidRecord, ValidationResult, ValidationSummary};

/// One row or object exactly as received. No guaranteed shape.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;
