use serde::Serialize;
use std::collections::BTreeSet;

use crate::types::Theme;

/// Distinct values used to populate the home page filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub models: Vec<String>,
    pub platforms: Vec<String>,
    pub resolutions: Vec<String>,
}

/// Collect the sorted, deduplicated model/platform/resolution sets.
///
/// Sorting is by byte order, the same order a browser's default
/// `Array.prototype.sort` gives these ASCII values.
pub fn extract_filter_options(themes: &[Theme]) -> FilterOptions {
    let mut models = BTreeSet::new();
    let mut platforms = BTreeSet::new();
    let mut resolutions = BTreeSet::new();

    for theme in themes {
        models.extend(theme.models());
        platforms.extend(theme.platform.values());
        if !theme.resolution.is_empty() {
            resolutions.insert(theme.resolution.as_str());
        }
    }

    fn owned(set: BTreeSet<&str>) -> Vec<String> {
        set.into_iter().map(str::to_string).collect()
    }

    FilterOptions {
        models: owned(models),
        platforms: owned(platforms),
        resolutions: owned(resolutions),
    }
}
