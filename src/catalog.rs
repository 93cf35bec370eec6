//! Component catalog loading.
//!
//! The catalog is fetched once per import session from an external
//! [`ComponentSource`] and frozen into a [`ComponentCatalog`] lookup table
//! that the resolver, normalizer and validator all consult.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ImportResult;
use crate::models::{ComponentCategory, ComponentDefinition};

/// The service that owns component definitions.
///
/// Implementations return every definition they know; the loader keeps the
/// active ones. Transport failures must be reported as
/// [`ImportError::CatalogUnavailable`](crate::error::ImportError::CatalogUnavailable).
#[async_trait]
pub trait ComponentSource: Send + Sync + 'static {
    /// Fetches all component definitions.
    async fn load_component_catalog(&self) -> ImportResult<Vec<ComponentDefinition>>;
}

#[async_trait]
impl<T: ComponentSource + ?Sized> ComponentSource for Arc<T> {
    async fn load_component_catalog(&self) -> ImportResult<Vec<ComponentDefinition>> {
        (**self).load_component_catalog().await
    }
}

/// A source backed by a fixed list, e.g. the seed `components.yaml`.
#[derive(Debug, Clone, Default)]
pub struct StaticComponentSource {
    components: Vec<ComponentDefinition>,
}

impl StaticComponentSource {
    /// Wraps a fixed list of definitions.
    pub fn new(components: Vec<ComponentDefinition>) -> Self {
        Self { components }
    }
}

#[async_trait]
impl ComponentSource for StaticComponentSource {
    async fn load_component_catalog(&self) -> ImportResult<Vec<ComponentDefinition>> {
        Ok(self.components.clone())
    }
}

/// Immutable code → definition table for one import session.
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    components: Vec<ComponentDefinition>,
    by_code: HashMap<String, usize>,
}

impl ComponentCatalog {
    /// Builds the table, dropping inactive definitions. On duplicate codes
    /// the first definition wins.
    pub fn new(definitions: Vec<ComponentDefinition>) -> Self {
        let mut components = Vec::with_capacity(definitions.len());
        let mut by_code = HashMap::with_capacity(definitions.len());

        for definition in definitions.into_iter().filter(|d| d.active) {
            if by_code.contains_key(&definition.code) {
                warn!(code = %definition.code, "Duplicate component code ignored");
                continue;
            }
            by_code.insert(definition.code.clone(), components.len());
            components.push(definition);
        }

        Self {
            components,
            by_code,
        }
    }

    /// An empty catalog: only base fields can be mapped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks a component up by code.
    pub fn get(&self, code: &str) -> Option<&ComponentDefinition> {
        self.by_code.get(code).map(|&i| &self.components[i])
    }

    /// Active definitions in source order.
    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }

    /// Number of active components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if no components are known.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The category of a code, if known.
    pub fn category_of(&self, code: &str) -> Option<ComponentCategory> {
        self.get(code).map(|c| c.category)
    }

    /// Returns true if the code belongs to a statistic or calculated
    /// component. Unknown codes are not derived.
    pub fn is_derived(&self, code: &str) -> bool {
        self.category_of(code).is_some_and(ComponentCategory::is_derived)
    }

    /// Display name for a code, if known.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.get(code).map(|c| c.name.as_str())
    }
}

/// Loads the active component catalog.
///
/// An empty result is not an error: it means no dynamic components are
/// known and only base fields can be mapped.
pub async fn load_components<S: ComponentSource + ?Sized>(
    source: &S,
) -> ImportResult<ComponentCatalog> {
    let definitions = source.load_component_catalog().await?;
    let catalog = ComponentCatalog::new(definitions);
    debug!(components = catalog.len(), "Component catalog loaded");
    Ok(catalog)
}

/// The catalog used for a session, and whether it had to fall back.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    /// The catalog to use.
    pub catalog: ComponentCatalog,
    /// True when the source was unreachable and the session runs with
    /// base-field-only mapping.
    pub degraded: bool,
}

/// Loads the catalog, falling back to an empty one with a warning when the
/// source is unavailable.
pub async fn load_catalog_or_empty<S: ComponentSource + ?Sized>(source: &S) -> CatalogLoad {
    match load_components(source).await {
        Ok(catalog) => CatalogLoad {
            catalog,
            degraded: false,
        },
        Err(err) => {
            warn!(error = %err, "Component catalog unavailable, mapping base fields only");
            CatalogLoad {
                catalog: ComponentCatalog::empty(),
                degraded: true,
            }
        }
    }
}
