//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading import
//! settings and the seed component catalog from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{ImportError, ImportResult};
use crate::models::ComponentDefinition;

use super::types::{ComponentsConfig, ImportConfig};

/// Loads and provides access to the import configuration.
///
/// # Directory Structure
///
/// ```text
/// config/payroll_import/
/// ├── import.yaml       # ImportConfig
/// └── components.yaml   # Seed component catalog
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_import::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll_import").unwrap();
/// println!("Production mode: {}", loader.import_config().production_mode);
/// println!("Components: {}", loader.components().len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    import: ImportConfig,
    components: Vec<ComponentDefinition>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns `ConfigNotFound` if either file is missing and
    /// `ConfigParseError` if either contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();

        let import = Self::load_yaml::<ImportConfig>(&path.join("import.yaml"))?;
        let components = Self::load_yaml::<ComponentsConfig>(&path.join("components.yaml"))?;

        Ok(Self {
            import,
            components: components.components,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> ImportResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ImportError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ImportError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the import settings.
    pub fn import_config(&self) -> &ImportConfig {
        &self.import
    }

    /// Returns every component definition in the seed file, including
    /// inactive ones.
    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }
}
