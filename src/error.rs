//! Catalog error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a theme catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("Malformed catalog {source_name}: {reason}")]
    MalformedCatalog { source_name: String, reason: String },

    #[error("Failed to fetch catalog from {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn malformed(source_name: impl Into<String>, reason: impl ToString) -> Self {
        CatalogError::MalformedCatalog {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        CatalogError::FetchFailure {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
