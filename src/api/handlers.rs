//! HTTP request handlers for the payroll import API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ImportError;

use super::request::{DraftRequest, ImportRequest, MappingRequest};
use super::response::{
    ApiError, ApiErrorResponse, ImportErrorBody, ImportResponse, MappingResponse, json_response,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/mappings", post(mappings_handler))
        .route("/drafts", post(drafts_handler))
        .route("/imports", post(imports_handler))
        .with_state(state)
}

/// Turns a JSON extraction failure into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /mappings.
///
/// Proposes a target for each source column.
async fn mappings_handler(
    State(state): State<AppState>,
    payload: Result<Json<MappingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing mapping request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let rules = state
        .importer()
        .map_fields(&request.source_fields, &request.overrides)
        .await;
    let threshold = state.config().ambiguity_threshold;
    let ambiguous_fields = rules
        .iter()
        .filter(|rule| rule.is_ambiguous(threshold))
        .map(|rule| rule.source_field.clone())
        .collect();

    info!(
        correlation_id = %correlation_id,
        columns = rules.len(),
        "Mapping completed"
    );
    json_response(
        StatusCode::OK,
        MappingResponse {
            rules,
            ambiguous_fields,
        },
    )
}

/// Handler for POST /drafts.
///
/// Normalizes and validates one record without submitting it.
async fn drafts_handler(
    State(state): State<AppState>,
    payload: Result<Json<DraftRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing draft request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let records = [request.record];
    let importer = state.importer();
    let mut prepared = match &request.source_fields {
        Some(fields) => {
            importer
                .prepare_with_fields(&records, fields, &request.overrides)
                .await
        }
        None => importer.prepare(&records, &request.overrides).await,
    };

    match prepared.results.pop() {
        Some(result) => {
            info!(
                correlation_id = %correlation_id,
                is_valid = result.is_valid,
                violations = result.errors.len(),
                "Draft validated"
            );
            json_response(StatusCode::OK, result)
        }
        None => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("INTERNAL_ERROR", "No draft was produced"),
        ),
    }
}

/// Handler for POST /imports.
///
/// Runs the whole import and submits the valid records.
async fn imports_handler(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing import request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let records = match request.records.into_records() {
        Ok(records) => records,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Unreadable import payload");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let start_time = Instant::now();
    let importer = state.importer();
    let overwrite_mode = request
        .overwrite_mode
        .unwrap_or(state.config().default_overwrite_mode);

    let prepared = importer.prepare(&records, &request.overrides).await;
    let submitted = importer
        .submit(&prepared, request.period_id.as_deref(), overwrite_mode)
        .await;

    match submitted {
        Ok(submission_result) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %prepared.session_id,
                valid = prepared.validation_summary.valid,
                invalid = prepared.validation_summary.invalid,
                success_count = submission_result.success_count,
                error_count = submission_result.error_count,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Import completed"
            );
            json_response(
                StatusCode::OK,
                ImportResponse {
                    session_id: prepared.session_id,
                    validation_summary: prepared.validation_summary,
                    submission_result,
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                session_id = %prepared.session_id,
                error = %err,
                recoverable = err.is_recoverable(),
                "Import failed"
            );
            import_error_response(err, prepared.validation_summary)
        }
    }
}

fn import_error_response(
    err: ImportError,
    validation_summary: crate::models::ValidationSummary,
) -> Response {
    let ApiErrorResponse { status, error } = err.into();
    json_response(
        status,
        ImportErrorBody {
            error,
            validation_summary,
        },
    )
}
