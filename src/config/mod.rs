//! Configuration loading for the payroll import engine.
//!
//! This module provides functionality to load import settings and the seed
//! component catalog from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_import::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll_import").unwrap();
//! println!("Closed periods: {:?}", config.import_config().closed_periods);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ComponentsConfig, ImportConfig};
