//! Configuration types for payroll import.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::models::ComponentDefinition;

/// Import behaviour settings from `import.yaml`.
///
/// Passed explicitly to the batch orchestrator and the resolver; nothing in
/// the engine reads the process environment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportConfig {
    /// When true, periods listed in `closed_periods` cannot be imported into.
    #[serde(default)]
    pub production_mode: bool,
    /// Periods that are closed to imports in production mode.
    #[serde(default)]
    pub closed_periods: Vec<String>,
    /// Mapping rules below this confidence are surfaced for manual review.
    #[serde(default = "default_ambiguity_threshold")]
    pub ambiguity_threshold: f64,
    /// Overwrite mode used when a request does not specify one.
    #[serde(default)]
    pub default_overwrite_mode: bool,
}

fn default_ambiguity_threshold() -> f64 {
    0.5
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            production_mode: false,
            closed_periods: Vec::new(),
            ambiguity_threshold: default_ambiguity_threshold(),
            default_overwrite_mode: false,
        }
    }
}

impl ImportConfig {
    /// Returns true if a batch may be submitted into the given period.
    ///
    /// Outside production mode every period is importable.
    pub fn is_period_importable(&self, period_id: &str) -> bool {
        !self.production_mode || !self.closed_periods.iter().any(|p| p == period_id)
    }
}

/// Seed component catalog from `components.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentsConfig {
    /// Component definitions, active and inactive.
    pub components: Vec<ComponentDefinition>,
}
