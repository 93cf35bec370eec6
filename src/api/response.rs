//! Response types for the payroll import API.
//!
//! This module defines the success bodies, the error body and the mapping
//! from [`ImportError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ImportError;
use crate::models::{BulkSubmissionResult, FieldMappingRule, ValidationSummary};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        json_response(self.status, self.error)
    }
}

impl From<ImportError> for ApiErrorResponse {
    fn from(error: ImportError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            ImportError::ConfigNotFound { .. } | ImportError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            ImportError::CatalogUnavailable { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("CATALOG_UNAVAILABLE", message),
            ),
            ImportError::InvalidInput { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("INVALID_INPUT", message))
            }
            ImportError::NoValidRecords { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "NO_VALID_RECORDS",
                    message,
                    "Correct the invalid records listed in the validation summary and re-import",
                ),
            ),
            ImportError::NoPeriodSelected => (
                StatusCode::BAD_REQUEST,
                ApiError::new("NO_PERIOD_SELECTED", message),
            ),
            ImportError::PeriodNotImportable { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("PERIOD_NOT_IMPORTABLE", message),
            ),
            ImportError::DuplicateRecord { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "DUPLICATE_RECORD",
                    message,
                    "Resubmit with overwrite_mode set to true to update existing entries",
                ),
            ),
            ImportError::SubmissionFailed { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("SUBMISSION_FAILED", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

/// Response body for `POST /mappings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingResponse {
    /// Resolved rules by descending confidence.
    pub rules: Vec<FieldMappingRule>,
    /// Columns below the ambiguity threshold.
    pub ambiguous_fields: Vec<String>,
}

/// Response body for a submitted `POST /imports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Correlation id of the import.
    pub session_id: Uuid,
    /// Validation counts and invalid records.
    pub validation_summary: ValidationSummary,
    /// The reconciled store result.
    pub submission_result: BulkSubmissionResult,
}

/// Error body for `POST /imports`: the error plus the validation summary,
/// so the operator sees which records to fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportErrorBody {
    /// The error.
    #[serde(flatten)]
    pub error: ApiError,
    /// Validation counts and invalid records.
    pub validation_summary: ValidationSummary,
}

/// Serializes `body` with an explicit JSON content type.
pub(super) fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_duplicate_record_maps_to_conflict() {
        let response: ApiErrorResponse = ImportError::DuplicateRecord {
            message: "unique (employee, period)".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "DUPLICATE_RECORD");
        assert!(response.error.details.unwrap().contains("overwrite_mode"));
    }

    #[test]
    fn test_status_codes() {
        let status = |error: ImportError| ApiErrorResponse::from(error).status;
        assert_eq!(
            status(ImportError::NoValidRecords { total: 2 }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status(ImportError::NoPeriodSelected), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(ImportError::SubmissionFailed {
                message: "timeout".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(ImportError::InvalidInput {
                message: "empty".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_import_error_body_flattens_error() {
        let body = ImportErrorBody {
            error: ApiError::new("NO_VALID_RECORDS", "none"),
            validation_summary: ValidationSummary::default(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "NO_VALID_RECORDS");
        assert_eq!(json["validation_summary"]["total"], 0);
    }
}
