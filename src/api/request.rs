//! Request types for the payroll import API.

use serde::{Deserialize, Serialize};

use crate::error::ImportResult;
use crate::ingest::parse_pasted_table;
use crate::mapping::MappingOverrides;
use crate::models::RawRecord;

/// Request body for `POST /mappings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRequest {
    /// Raw column names to resolve.
    pub source_fields: Vec<String>,
    /// Operator-pinned targets by column.
    #[serde(default)]
    pub overrides: MappingOverrides,
}

/// Request body for `POST /drafts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRequest {
    /// The row to normalize and validate.
    pub record: RawRecord,
    /// The batch's full column set. Defaults to the record's own keys.
    #[serde(default)]
    pub source_fields: Option<Vec<String>>,
    /// Operator-pinned targets by column.
    #[serde(default)]
    pub overrides: MappingOverrides,
}

/// The rows of an import: JSON objects, or text pasted from a spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportRecords {
    /// Already-structured rows.
    Rows(Vec<RawRecord>),
    /// Tab or comma separated text with a header row.
    Pasted(String),
}

impl ImportRecords {
    /// Converts the payload into raw records.
    pub fn into_records(self) -> ImportResult<Vec<RawRecord>> {
        match self {
            ImportRecords::Rows(rows) => Ok(rows),
            ImportRecords::Pasted(text) => parse_pasted_table(&text),
        }
    }
}

/// Request body for `POST /imports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// The rows to import.
    pub records: ImportRecords,
    /// Target pay period.
    #[serde(default)]
    pub period_id: Option<String>,
    /// Overwrite mode; the configured default applies when omitted.
    #[serde(default)]
    pub overwrite_mode: Option<bool>,
    /// Operator-pinned targets by column.
    #[serde(default)]
    pub overrides: MappingOverrides,
}
