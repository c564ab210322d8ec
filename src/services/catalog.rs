use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Scheme, StateRule};

/// Errors that can occur while loading the scheme catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    schemes: Vec<Scheme>,
}

/// Immutable in-memory scheme catalog, loaded once at startup and shared
/// read-only across all request handlers.
#[derive(Debug, Default)]
pub struct Catalog {
    schemes: Vec<Scheme>,
}

impl Catalog {
    /// Load the catalog from a JSON file of the shape `{"schemes": [...]}`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(
            "Loaded {} schemes from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Parse a catalog from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_schemes(file.schemes))
    }

    pub fn from_schemes(schemes: Vec<Scheme>) -> Self {
        Self { schemes }
    }

    /// An empty catalog; the degraded fallback when loading fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all_schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn by_id(&self, scheme_id: &str) -> Option<&Scheme> {
        self.schemes.iter().find(|s| s.id == scheme_id)
    }

    pub fn by_category(&self, category: &str) -> Vec<&Scheme> {
        self.schemes
            .iter()
            .filter(|s| s.category.eq_ignore_ascii_case(category))
            .collect()
    }

    pub fn by_type(&self, scheme_type: &str) -> Vec<&Scheme> {
        self.schemes
            .iter()
            .filter(|s| s.scheme_type.eq_ignore_ascii_case(scheme_type))
            .collect()
    }

    /// Schemes applicable to a state: nationwide schemes plus schemes that
    /// list the state explicitly.
    pub fn by_state(&self, state: &str) -> Vec<&Scheme> {
        self.schemes
            .iter()
            .filter(|s| match &s.eligibility.states {
                StateRule::All => true,
                StateRule::AnyOf(states) => states.iter().any(|candidate| candidate == state),
            })
            .collect()
    }

    /// All distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .schemes
            .iter()
            .filter(|s| !s.category.is_empty())
            .map(|s| s.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}
