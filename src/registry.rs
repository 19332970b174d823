//! Source registry configuration.
//!
//! The registry is loaded once at startup and read-only afterwards, so it is
//! freely shared across concurrent jobs without locking.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, SiftError};

fn default_priority() -> u8 {
    5
}

/// A configured content source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Unique source name.
    pub name: String,
    /// URL the source is fetched from.
    pub url: String,
    /// Rank, 1 = most authoritative, 10 = least.
    #[serde(default = "default_priority")]
    pub priority: u8,
    /// Keywords this source is relevant for.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Category names this source belongs to.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A named group of sources with its own keyword list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCategory {
    /// Keywords driving category-wide searches, in declared order.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Member source names, in declared order.
    #[serde(default)]
    pub sources: Vec<String>,
}

/// The catalog of sources, categories and keyword synonym mappings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRegistry {
    #[serde(rename = "ai_news_sources", default)]
    sources: Vec<Source>,
    #[serde(rename = "search_categories", default)]
    categories: BTreeMap<String, SearchCategory>,
    #[serde(rename = "keyword_mappings", default)]
    keyword_mappings: BTreeMap<String, Vec<String>>,
}

impl SourceRegistry {
    /// Loads the registry from a JSON file.
    ///
    /// A missing or malformed file is a fatal configuration error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SiftError::Config(format!("Cannot read sources file {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw).map_err(|e| {
            SiftError::Config(format!("Malformed sources file {}: {}", path.display(), e))
        })
    }

    /// Parses a registry from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// All configured sources, in file order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Looks up a category by exact name.
    pub fn category(&self, name: &str) -> Option<&SearchCategory> {
        self.categories.get(name)
    }

    /// All categories with their names.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &SearchCategory)> {
        self.categories.iter().map(|(name, cat)| (name.as_str(), cat))
    }

    /// Keyword synonym mappings used to expand queries during scoring.
    pub fn keyword_mappings(&self) -> &BTreeMap<String, Vec<String>> {
        &self.keyword_mappings
    }
}
