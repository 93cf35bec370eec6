//! The end-to-end import: map → normalize → validate → submit.
//!
//! [`PayrollImporter::run_import`] is the single entry point most callers
//! need. It is split into [`prepare`](PayrollImporter::prepare), which never
//! touches the store, and [`submit`](PayrollImporter::submit), so a caller
//! can show the validation summary before (or instead of) submitting.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::batch::{BatchOrchestrator, EntrySink};
use crate::catalog::{ComponentCatalog, ComponentSource, load_catalog_or_empty};
use crate::config::ImportConfig;
use crate::error::ImportResult;
use crate::ingest::collect_source_fields;
use crate::mapping::{MappingOverrides, MappingPlan, map_fields_with_overrides};
use crate::models::{
    BulkSubmissionResult, FieldMappingRule, RawRecord, ValidationResult, ValidationSummary,
};
use crate::normalize::build_drafts;
use crate::validation::InvariantValidator;

/// Everything known about an import before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedImport {
    /// Correlation id for the session's log lines.
    pub session_id: Uuid,
    /// True when the component catalog was unavailable and only base fields
    /// were mapped.
    pub catalog_degraded: bool,
    /// The mapping applied to every row, by descending confidence.
    pub mapping_rules: Vec<FieldMappingRule>,
    /// One result per source row, in source order.
    pub results: Vec<ValidationResult>,
    /// Counts, invalid records and ambiguous columns.
    pub validation_summary: ValidationSummary,
}

/// The outcome of a submitted import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Correlation id.
    pub session_id: Uuid,
    /// When the import started.
    pub started_at: DateTime<Utc>,
    /// When the store answered.
    pub completed_at: DateTime<Utc>,
    /// True when the catalog fell back to base fields only.
    pub catalog_degraded: bool,
    /// Validation counts and details.
    pub validation_summary: ValidationSummary,
    /// The reconciled store result.
    pub submission_result: BulkSubmissionResult,
}

/// Runs imports against a component source and an entry sink.
pub struct PayrollImporter<C, S> {
    components: C,
    orchestrator: BatchOrchestrator<S>,
}

impl<C: ComponentSource, S: EntrySink> PayrollImporter<C, S> {
    /// Creates an importer. `config` gates periods and sets the ambiguity
    /// threshold.
    pub fn new(components: C, sink: S, config: ImportConfig) -> Self {
        Self {
            components,
            orchestrator: BatchOrchestrator::new(sink, config),
        }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &ImportConfig {
        self.orchestrator.config()
    }

    /// Loads the catalog for one session, falling back to an empty one.
    pub async fn load_catalog(&self) -> (ComponentCatalog, bool) {
        let load = load_catalog_or_empty(&self.components).await;
        (load.catalog, load.degraded)
    }

    /// Proposes mappings for a column set without touching any record.
    pub async fn map_fields(
        &self,
        source_fields: &[String],
        overrides: &MappingOverrides,
    ) -> Vec<FieldMappingRule> {
        let (catalog, _) = self.load_catalog().await;
        map_fields_with_overrides(source_fields, &catalog, overrides)
    }

    /// Maps, normalizes and validates every record. The column set is
    /// collected from the records themselves.
    pub async fn prepare(&self, records: &[RawRecord], overrides: &MappingOverrides) -> PreparedImport {
        let source_fields = collect_source_fields(records);
        self.prepare_with_fields(records, &source_fields, overrides).await
    }

    /// Like [`prepare`](Self::prepare), with an explicit column set. Columns
    /// outside `source_fields` are ignored.
    pub async fn prepare_with_fields(
        &self,
        records: &[RawRecord],
        source_fields: &[String],
        overrides: &MappingOverrides,
    ) -> PreparedImport {
        let session_id = Uuid::new_v4();
        let start = Instant::now();
        info!(
            session_id = %session_id,
            records = records.len(),
            columns = source_fields.len(),
            "Preparing payroll import"
        );

        let (catalog, catalog_degraded) = self.load_catalog().await;
        if catalog_degraded {
            warn!(session_id = %session_id, "Importing with base-field-only mapping");
        }

        let plan = MappingPlan::new(map_fields_with_overrides(source_fields, &catalog, overrides));
        let ambiguous_fields = plan.ambiguous_fields(self.config().ambiguity_threshold);
        if !ambiguous_fields.is_empty() {
            warn!(
                session_id = %session_id,
                columns = ?ambiguous_fields,
                "Field mappings need manual review"
            );
        }

        let drafts = build_drafts(records, &plan, &catalog);
        let results = InvariantValidator::new(&catalog).validate_all(drafts);

        let mut validation_summary = ValidationSummary::from_results(&results);
        validation_summary.ambiguous_fields = ambiguous_fields;

        info!(
            session_id = %session_id,
            total = validation_summary.total,
            valid = validation_summary.valid,
            invalid = validation_summary.invalid,
            duration_us = start.elapsed().as_micros() as u64,
            "Payroll import prepared"
        );

        PreparedImport {
            session_id,
            catalog_degraded,
            mapping_rules: plan.rules().to_vec(),
            results,
            validation_summary,
        }
    }

    /// Submits the valid records of a prepared import.
    pub async fn submit(
        &self,
        prepared: &PreparedImport,
        period_id: Option<&str>,
        overwrite_mode: bool,
    ) -> ImportResult<BulkSubmissionResult> {
        self.orchestrator
            .submit(&prepared.results, period_id, overwrite_mode)
            .await
            .inspect_err(|err| {
                warn!(session_id = %prepared.session_id, error = %err, "Payroll import not submitted");
            })
    }

    /// Runs the whole import.
    pub async fn run_import(
        &self,
        records: &[RawRecord],
        period_id: Option<&str>,
        overwrite_mode: bool,
    ) -> ImportResult<ImportOutcome> {
        let started_at = Utc::now();
        let prepared = self.prepare(records, &MappingOverrides::new()).await;
        let submission_result = self.submit(&prepared, period_id, overwrite_mode).await?;

        Ok(ImportOutcome {
            session_id: prepared.session_id,
            started_at,
            completed_at: Utc::now(),
            catalog_degraded: prepared.catalog_degraded,
            validation_summary: prepared.validation_summary,
            submission_result,
        })
    }
}
