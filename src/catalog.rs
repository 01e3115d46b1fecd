use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::CatalogError;
use crate::types::{ModelImages, Theme};

/// Parse catalog text into theme records.
///
/// The only structural requirement is a top-level array of objects; missing
/// fields inside a record are left at their defaults.
pub fn parse_catalog(text: &str, source_name: &str) -> Result<Vec<Theme>, CatalogError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CatalogError::malformed(source_name, e))?;

    let Value::Array(items) = value else {
        return Err(CatalogError::malformed(
            source_name,
            "top-level value is not an array",
        ));
    };

    let mut themes = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(CatalogError::malformed(
                source_name,
                format!("entry {} is not an object", i),
            ));
        }
        let theme: Theme = serde_json::from_value(item)
            .map_err(|e| CatalogError::malformed(source_name, format!("entry {}: {}", i, e)))?;
        themes.push(theme);
    }

    warn_suspicious(&themes);
    Ok(themes)
}

/// Log entries that will produce broken output without rejecting them
fn warn_suspicious(themes: &[Theme]) {
    let mut seen = HashSet::new();
    for theme in themes {
        if !seen.insert(theme.id.as_str()) {
            warn!("Duplicate theme id '{}', later page overwrites earlier", theme.id);
        }
        if theme.file.is_empty() {
            warn!("Theme '{}' has no download file", theme.id);
        }
    }
}

/// Read a file, mapping "not found" to `MissingInputFile`
fn read_input(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CatalogError::MissingInputFile {
            path: path.to_path_buf(),
        },
        _ => CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Load the theme catalog from disk
pub fn load_catalog(path: &Path) -> Result<Vec<Theme>, CatalogError> {
    let content = read_input(path)?;
    let themes = parse_catalog(&content, &path.display().to_string())?;
    debug!("Parsed {} themes from {}", themes.len(), path.display());
    Ok(themes)
}

/// Fetch the theme catalog over HTTP. Loaded once, never retried.
pub fn fetch_catalog(url: &str) -> Result<Vec<Theme>, CatalogError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("Mozilla/5.0 (compatible; ThemesSite/1.0)")
        .build()
        .map_err(|e| CatalogError::fetch(url, e))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| CatalogError::fetch(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::fetch(url, format!("HTTP {}", status.as_u16())));
    }

    let body = response.text().map_err(|e| CatalogError::fetch(url, e))?;
    parse_catalog(&body, url).map_err(|e| CatalogError::fetch(url, e))
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Load a catalog from either a local path or an http(s) URL
pub fn load_catalog_from(location: &str) -> Result<Vec<Theme>, CatalogError> {
    if is_remote(location) {
        fetch_catalog(location)
    } else {
        load_catalog(Path::new(location))
    }
}

/// Load the optional model image lookup. A missing file is not an error.
pub fn load_model_images(path: &Path) -> Result<Option<ModelImages>, CatalogError> {
    let content = match read_input(path) {
        Ok(c) => c,
        Err(CatalogError::MissingInputFile { .. }) => {
            debug!("No model image table at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let images: ModelImages = serde_json::from_str(&content)
        .map_err(|e| CatalogError::malformed(path.display().to_string(), e))?;
    Ok(Some(images))
}
