//! Payroll Import Engine
//!
//! This crate reconciles heterogeneous payroll spreadsheets and hand-written
//! JSON against a runtime-defined catalog of payroll components, validates
//! the accounting invariants that apply to each personnel category and
//! submits the valid entries as one bulk upsert.

#![warn(missing_docs)]

pub mod api;
pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ingest;
pub mod mapping;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod validation;
