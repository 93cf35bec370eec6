//! Application state for the payroll import API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::batch::{EntrySink, InMemorySink};
use crate::catalog::{ComponentSource, StaticComponentSource};
use crate::config::{ConfigLoader, ImportConfig};
use crate::pipeline::PayrollImporter;

/// The importer type the API runs, over trait objects so any source and
/// store can be wired in.
pub type SharedImporter = PayrollImporter<Arc<dyn ComponentSource>, Arc<dyn EntrySink>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    importer: Arc<SharedImporter>,
}

impl AppState {
    /// Creates state over an external component source and entry store.
    pub fn new(
        components: Arc<dyn ComponentSource>,
        sink: Arc<dyn EntrySink>,
        config: ImportConfig,
    ) -> Self {
        Self {
            importer: Arc::new(PayrollImporter::new(components, sink, config)),
        }
    }

    /// Creates state from a loaded configuration directory, serving the
    /// seed catalog and storing entries in memory.
    pub fn from_config(loader: &ConfigLoader) -> Self {
        Self::new(
            Arc::new(StaticComponentSource::new(loader.components().to_vec())),
            Arc::new(InMemorySink::new()),
            loader.import_config().clone(),
        )
    }

    /// Returns the importer.
    pub fn importer(&self) -> &SharedImporter {
        &self.importer
    }

    /// Returns the import configuration.
    pub fn config(&self) -> &ImportConfig {
        self.importer.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }
}
