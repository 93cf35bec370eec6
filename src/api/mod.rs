//! HTTP API module for the payroll import engine.
//!
//! This module provides the REST endpoints the presentation layer calls:
//! column mapping, single-record preview and full imports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DraftRequest, ImportRecords, ImportRequest, MappingRequest};
pub use response::{ApiError, ImportErrorBody, ImportResponse, MappingResponse};
pub use state::{AppState, SharedImporter};
